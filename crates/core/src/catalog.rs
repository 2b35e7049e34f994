//! Static catalog tables: producer categories, provinces, story value tags
//! and shipping methods.
//!
//! Categories and shipping methods are enums so that every icon/label
//! lookup is an exhaustive `match`. Provinces and value tags are plain
//! slug tables.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Producer categories
// ---------------------------------------------------------------------------

/// What a producer sells. Serialized as the lowercase Spanish slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerCategory {
    Vegetales,
    Frutas,
    Lacteos,
    Quesos,
    Carnes,
    Embutidos,
    Panaderia,
    Aceites,
    Vinos,
    Miel,
    Conservas,
    Huevos,
}

impl ProducerCategory {
    pub const ALL: [ProducerCategory; 12] = [
        Self::Vegetales,
        Self::Frutas,
        Self::Lacteos,
        Self::Quesos,
        Self::Carnes,
        Self::Embutidos,
        Self::Panaderia,
        Self::Aceites,
        Self::Vinos,
        Self::Miel,
        Self::Conservas,
        Self::Huevos,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Vegetales => "vegetales",
            Self::Frutas => "frutas",
            Self::Lacteos => "lacteos",
            Self::Quesos => "quesos",
            Self::Carnes => "carnes",
            Self::Embutidos => "embutidos",
            Self::Panaderia => "panaderia",
            Self::Aceites => "aceites",
            Self::Vinos => "vinos",
            Self::Miel => "miel",
            Self::Conservas => "conservas",
            Self::Huevos => "huevos",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Vegetales => "Verduras y hortalizas",
            Self::Frutas => "Frutas",
            Self::Lacteos => "Lácteos",
            Self::Quesos => "Quesos",
            Self::Carnes => "Carnes",
            Self::Embutidos => "Embutidos",
            Self::Panaderia => "Panadería y repostería",
            Self::Aceites => "Aceites",
            Self::Vinos => "Vinos",
            Self::Miel => "Miel",
            Self::Conservas => "Conservas",
            Self::Huevos => "Huevos",
        }
    }

    /// Icon name rendered next to the category chip.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Vegetales => "carrot",
            Self::Frutas => "apple",
            Self::Lacteos => "milk",
            Self::Quesos => "cheese",
            Self::Carnes => "beef",
            Self::Embutidos => "ham",
            Self::Panaderia => "croissant",
            Self::Aceites => "droplet",
            Self::Vinos => "wine",
            Self::Miel => "hexagon",
            Self::Conservas => "jar",
            Self::Huevos => "egg",
        }
    }

    pub fn from_slug(slug: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == slug)
            .ok_or_else(|| CoreError::Validation(format!("Unknown producer category '{slug}'")))
    }
}

// ---------------------------------------------------------------------------
// Provinces
// ---------------------------------------------------------------------------

/// Spanish provinces plus the autonomous cities, as `(slug, name)`.
pub const PROVINCES: &[(&str, &str)] = &[
    ("a_coruna", "A Coruña"),
    ("alava", "Álava"),
    ("albacete", "Albacete"),
    ("alicante", "Alicante"),
    ("almeria", "Almería"),
    ("asturias", "Asturias"),
    ("avila", "Ávila"),
    ("badajoz", "Badajoz"),
    ("baleares", "Illes Balears"),
    ("barcelona", "Barcelona"),
    ("bizkaia", "Bizkaia"),
    ("burgos", "Burgos"),
    ("caceres", "Cáceres"),
    ("cadiz", "Cádiz"),
    ("cantabria", "Cantabria"),
    ("castellon", "Castellón"),
    ("ceuta", "Ceuta"),
    ("ciudad_real", "Ciudad Real"),
    ("cordoba", "Córdoba"),
    ("cuenca", "Cuenca"),
    ("gipuzkoa", "Gipuzkoa"),
    ("girona", "Girona"),
    ("granada", "Granada"),
    ("guadalajara", "Guadalajara"),
    ("huelva", "Huelva"),
    ("huesca", "Huesca"),
    ("jaen", "Jaén"),
    ("la_rioja", "La Rioja"),
    ("las_palmas", "Las Palmas"),
    ("leon", "León"),
    ("lleida", "Lleida"),
    ("lugo", "Lugo"),
    ("madrid", "Madrid"),
    ("malaga", "Málaga"),
    ("melilla", "Melilla"),
    ("murcia", "Murcia"),
    ("navarra", "Navarra"),
    ("ourense", "Ourense"),
    ("palencia", "Palencia"),
    ("pontevedra", "Pontevedra"),
    ("salamanca", "Salamanca"),
    ("santa_cruz_de_tenerife", "Santa Cruz de Tenerife"),
    ("segovia", "Segovia"),
    ("sevilla", "Sevilla"),
    ("soria", "Soria"),
    ("tarragona", "Tarragona"),
    ("teruel", "Teruel"),
    ("toledo", "Toledo"),
    ("valencia", "Valencia"),
    ("valladolid", "Valladolid"),
    ("zamora", "Zamora"),
    ("zaragoza", "Zaragoza"),
];

pub fn is_known_province(slug: &str) -> bool {
    PROVINCES.iter().any(|(s, _)| *s == slug)
}

// ---------------------------------------------------------------------------
// Story value tags
// ---------------------------------------------------------------------------

/// Value tags a producer can attach to their story, as `(slug, label)`.
pub const VALUE_TAGS: &[(&str, &str)] = &[
    ("ecologico", "Ecológico"),
    ("km0", "Kilómetro cero"),
    ("tradicion", "Tradición"),
    ("sostenibilidad", "Sostenibilidad"),
    ("bienestar_animal", "Bienestar animal"),
    ("comercio_justo", "Comercio justo"),
    ("familiar", "Negocio familiar"),
    ("artesanal", "Artesanal"),
];

pub fn is_known_value_tag(slug: &str) -> bool {
    VALUE_TAGS.iter().any(|(s, _)| *s == slug)
}

// ---------------------------------------------------------------------------
// Shipping methods
// ---------------------------------------------------------------------------

/// How a producer gets orders to buyers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Producer delivers with their own vehicle.
    OwnDelivery,
    Courier,
    /// Refrigerated courier for perishable goods.
    ColdChain,
    /// Buyer collects at the farm or workshop.
    Pickup,
}

impl ShippingMethod {
    pub const ALL: [ShippingMethod; 4] = [
        Self::OwnDelivery,
        Self::Courier,
        Self::ColdChain,
        Self::Pickup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::OwnDelivery => "Reparto propio",
            Self::Courier => "Mensajería",
            Self::ColdChain => "Mensajería refrigerada",
            Self::Pickup => "Recogida en origen",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::OwnDelivery => "truck",
            Self::Courier => "package",
            Self::ColdChain => "snowflake",
            Self::Pickup => "store",
        }
    }
}
