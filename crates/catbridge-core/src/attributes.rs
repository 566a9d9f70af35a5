//! Attribute names shared by both catalogs after ingestion mapping.

pub const CATEGORY: &str = "category";
pub const GENDER: &str = "gender";
pub const BRAND: &str = "brand";
pub const SEASON: &str = "season";
pub const COLOR: &str = "color";
pub const MATERIAL: &str = "material";
pub const FASTENER: &str = "fastener";
pub const SOLE: &str = "sole";
pub const HEEL: &str = "heel";
pub const TOE: &str = "toe";
pub const LAST_CODE: &str = "last_code";
pub const LAST_FAMILY: &str = "last_family";
pub const LAST_TYPE: &str = "last_type";
pub const SIZES: &str = "sizes";
pub const STOCK: &str = "stock";
pub const PRICE: &str = "price";

/// Attributes the enrichment collector borrows from linked records.
pub const ENRICHED_ATTRIBUTES: &[&str] = &[
    CATEGORY,
    GENDER,
    BRAND,
    SEASON,
    COLOR,
    MATERIAL,
    FASTENER,
    SOLE,
    HEEL,
    TOE,
    LAST_CODE,
    LAST_FAMILY,
    LAST_TYPE,
];

/// Categorical attributes that earn an exact-match bonus when scoring.
pub const CATEGORICAL_ATTRIBUTES: &[&str] = &[SEASON, COLOR, MATERIAL, FASTENER, SOLE, HEEL, TOE];
