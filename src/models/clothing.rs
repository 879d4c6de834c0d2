use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Clothing category as stored by the wardrobe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tshirt,
    Pants,
    Jacket,
    Dress,
    Skirt,
    Shorts,
    Hoodie,
    Sweater,
    Coat,
    Blouse,
    Shoes,
    Accessories,
    Boots,
    Sneakers,
    Sandals,
    Hat,
    Scarf,
    Gloves,
    Socks,
    Underwear,
    Swimwear,
    Belt,
    Bag,
    Watch,
    Jeans,
    Leggings,
    TankTop,
    Overalls,
    Beanie,
}

impl Category {
    pub const ALL: [Category; 29] = [
        Category::Tshirt,
        Category::Pants,
        Category::Jacket,
        Category::Dress,
        Category::Skirt,
        Category::Shorts,
        Category::Hoodie,
        Category::Sweater,
        Category::Coat,
        Category::Blouse,
        Category::Shoes,
        Category::Accessories,
        Category::Boots,
        Category::Sneakers,
        Category::Sandals,
        Category::Hat,
        Category::Scarf,
        Category::Gloves,
        Category::Socks,
        Category::Underwear,
        Category::Swimwear,
        Category::Belt,
        Category::Bag,
        Category::Watch,
        Category::Jeans,
        Category::Leggings,
        Category::TankTop,
        Category::Overalls,
        Category::Beanie,
    ];

    /// Key used by the knowledge base documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tshirt => "tshirt",
            Category::Pants => "pants",
            Category::Jacket => "jacket",
            Category::Dress => "dress",
            Category::Skirt => "skirt",
            Category::Shorts => "shorts",
            Category::Hoodie => "hoodie",
            Category::Sweater => "sweater",
            Category::Coat => "coat",
            Category::Blouse => "blouse",
            Category::Shoes => "shoes",
            Category::Accessories => "accessories",
            Category::Boots => "boots",
            Category::Sneakers => "sneakers",
            Category::Sandals => "sandals",
            Category::Hat => "hat",
            Category::Scarf => "scarf",
            Category::Gloves => "gloves",
            Category::Socks => "socks",
            Category::Underwear => "underwear",
            Category::Swimwear => "swimwear",
            Category::Belt => "belt",
            Category::Bag => "bag",
            Category::Watch => "watch",
            Category::Jeans => "jeans",
            Category::Leggings => "leggings",
            Category::TankTop => "tank_top",
            Category::Overalls => "overalls",
            Category::Beanie => "beanie",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("Invalid category value: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" => Ok(Season::Autumn),
            other => Err(format!("Invalid season value: {}", other)),
        }
    }
}

/// RGB color, each channel 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// A clothing item owned by a user, read-only to the recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: i64,
    pub name: String,
    /// Stored image file name
    pub filename: String,
    pub category: Category,
    pub season: Season,
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub blue: Option<u8>,
    pub is_favorite: bool,
}

impl ClothingItem {
    /// Item color, only when all three channels are known
    pub fn color(&self) -> Option<Rgb> {
        match (self.red, self.green, self.blue) {
            (Some(red), Some(green), Some(blue)) => Some(Rgb { red, green, blue }),
            _ => None,
        }
    }
}

/// Wardrobe slot used to assemble outfits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WardrobeSlot {
    Tops,
    Bottoms,
    Outerwear,
    OnePiece,
    Footwear,
    Headwear,
    Accessories,
    Underwear,
    Unknown,
}

impl WardrobeSlot {
    /// Slots contributing at most one pick on top of a base outfit
    pub const OPTIONAL: [WardrobeSlot; 4] = [
        WardrobeSlot::Footwear,
        WardrobeSlot::Headwear,
        WardrobeSlot::Accessories,
        WardrobeSlot::Underwear,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_category_serde_matches_knowledge_base_key() {
        let json = serde_json::to_string(&Category::TankTop).unwrap();
        assert_eq!(json, r#""tank_top""#);
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!("cape".parse::<Category>().is_err());
    }

    #[test]
    fn test_season_parse() {
        assert_eq!("autumn".parse::<Season>(), Ok(Season::Autumn));
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn test_color_requires_all_channels() {
        let mut item = ClothingItem {
            id: 1,
            name: "Linen shirt".to_string(),
            filename: "shirt.png".to_string(),
            category: Category::Blouse,
            season: Season::Summer,
            red: Some(10),
            green: Some(20),
            blue: Some(30),
            is_favorite: false,
        };
        assert_eq!(item.color(), Some(Rgb::new(10, 20, 30)));

        item.green = None;
        assert_eq!(item.color(), None);
    }

    #[test]
    fn test_slot_serializes_snake_case() {
        let json = serde_json::to_string(&WardrobeSlot::OnePiece).unwrap();
        assert_eq!(json, r#""one_piece""#);
    }
}
