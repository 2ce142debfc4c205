//! Property input and the model feature vector built from it.

use crate::core::country::CountryCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const DEFAULT_BEDROOMS: f64 = 3.0;
pub const DEFAULT_BATHROOMS: f64 = 2.0;
pub const DEFAULT_SQFT: f64 = 2000.0;
pub const DEFAULT_YEAR_BUILT: f64 = 2000.0;
pub const DEFAULT_QUALITY: f64 = 5.0;
const LOT_SIZE_FACTOR: f64 = 1.5;

/// Property details as captured from the user, all fields free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyInput {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<String>,
    #[serde(default)]
    pub bathrooms: Option<String>,
    #[serde(default)]
    pub square_footage: Option<String>,
    #[serde(default)]
    pub lot_size: Option<String>,
    #[serde(default)]
    pub year_built: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub features: Option<String>,
    /// Country whose currency the local price is shown in.
    #[serde(default)]
    pub country: Option<CountryCode>,
}

/// Named numeric model input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(BTreeMap<String, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureVector {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Parses a numeric form field, treating blank, invalid and zero as absent.
pub fn parse_number(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v != 0.0)
        .unwrap_or(default)
}

/// Maps a qualitative condition label to the 1-10 overall quality score.
pub fn quality_score(condition: Option<&str>) -> f64 {
    match condition.map(|c| c.trim().to_lowercase()).as_deref() {
        Some("excellent") => 10.0,
        Some("good") => 7.0,
        Some("fair") => 5.0,
        Some("poor") => 3.0,
        _ => DEFAULT_QUALITY,
    }
}

/// Splits a bathroom count into full and half baths.
pub fn split_bathrooms(bathrooms: f64) -> (f64, f64) {
    let full = bathrooms.floor();
    // Remainder keeps the sign of the input, so negative counts get no half bath.
    let half = if bathrooms % 1.0 >= 0.5 { 1.0 } else { 0.0 };
    (full, half)
}

/// Fixed numeric values of a typical residential property.
const NUMERIC_DEFAULTS: &[(&str, f64)] = &[
    ("Id", 1.0),
    ("MSSubClass", 60.0),
    ("LotFrontage", 70.0),
    ("OverallCond", 5.0),
    ("MasVnrArea", 0.0),
    ("BsmtFinSF1", 0.0),
    ("BsmtFinSF2", 0.0),
    ("BsmtUnfSF", 0.0),
    ("TotalBsmtSF", 0.0),
    ("LowQualFinSF", 0.0),
    ("BsmtFullBath", 0.0),
    ("BsmtHalfBath", 0.0),
    ("KitchenAbvGr", 1.0),
    ("Fireplaces", 0.0),
    ("GarageCars", 1.0),
    ("GarageArea", 200.0),
    ("WoodDeckSF", 0.0),
    ("OpenPorchSF", 0.0),
    ("EnclosedPorch", 0.0),
    ("3SsnPorch", 0.0),
    ("ScreenPorch", 0.0),
    ("PoolArea", 0.0),
    ("MiscVal", 0.0),
    ("MoSold", 6.0),
    ("YrSold", 2008.0),
];

/// Categorical columns of the model: (column, levels, chosen level).
const CATEGORICAL_DEFAULTS: &[(&str, &[&str], &str)] = &[
    ("MSZoning", &["A", "C (all)", "FV", "I", "RH", "RL", "RP", "RM"], "RL"),
    ("Street", &["Grvl", "Pave"], "Pave"),
    ("Alley", &["Grvl", "Pave", "NA"], "NA"),
    ("LotShape", &["Reg", "IR1", "IR2", "IR3"], "Reg"),
    ("LandContour", &["Lvl", "Bnk", "HLS", "Low"], "Lvl"),
    ("Utilities", &["AllPub", "NoSewr", "NoSeWa", "ELO"], "AllPub"),
    (
        "LotConfig",
        &["Inside", "Corner", "CulDSac", "FR2", "FR3"],
        "Inside",
    ),
    ("LandSlope", &["Gtl", "Mod", "Sev"], "Gtl"),
    (
        "Neighborhood",
        &[
            "Blmngtn", "Blueste", "BrDale", "BrkSide", "ClearCr", "CollgCr", "Crawfor", "Edwards",
            "Gilbert", "IDOTRR", "MeadowV", "Mitchel", "NAmes", "NoRidge", "NPkVill", "NridgHt",
            "NWAmes", "OldTown", "SWISU", "Sawyer", "SawyerW", "Somerst", "StoneBr", "Timber",
            "Veenker",
        ],
        "CollgCr",
    ),
    (
        "Condition1",
        &[
            "Artery", "Feedr", "Norm", "RRNn", "RRAn", "PosN", "PosA", "RRNe", "RRAe",
        ],
        "Norm",
    ),
    (
        "Condition2",
        &[
            "Artery", "Feedr", "Norm", "RRNn", "RRAn", "PosN", "PosA", "RRNe", "RRAe",
        ],
        "Norm",
    ),
    (
        "BldgType",
        &["1Fam", "2fmCon", "Duplex", "TwnhsE", "Twnhs"],
        "1Fam",
    ),
    (
        "HouseStyle",
        &[
            "1Story", "1.5Fin", "1.5Unf", "2Story", "2.5Fin", "2.5Unf", "SFoyer", "SLvl",
        ],
        "2Story",
    ),
    (
        "RoofStyle",
        &["Flat", "Gable", "Gambrel", "Hip", "Mansard", "Shed"],
        "Gable",
    ),
    (
        "RoofMatl",
        &[
            "ClyTile", "CompShg", "Membran", "Metal", "Roll", "Tar&Grv", "WdShake", "WdShngl",
        ],
        "CompShg",
    ),
    (
        "Exterior1st",
        &[
            "AsbShng", "AsphShn", "BrkComm", "BrkFace", "CBlock", "CemntBd", "HdBoard", "ImStucc",
            "MetalSd", "Plywood", "Stone", "Stucco", "VinylSd", "Wd Sdng", "WdShing",
        ],
        "VinylSd",
    ),
    (
        "Exterior2nd",
        &[
            "AsbShng", "AsphShn", "Brk Cmn", "BrkFace", "CBlock", "CmentBd", "HdBoard", "ImStucc",
            "MetalSd", "Other", "Plywood", "Stone", "Stucco", "VinylSd", "Wd Sdng", "Wd Shng",
        ],
        "VinylSd",
    ),
    ("MasVnrType", &["BrkCmn", "BrkFace", "None", "Stone"], "None"),
    ("ExterQual", &["Ex", "Gd", "TA", "Fa", "Po"], "TA"),
    ("ExterCond", &["Ex", "Gd", "TA", "Fa", "Po"], "TA"),
    (
        "Foundation",
        &["BrkTil", "CBlock", "PConc", "Slab", "Stone", "Wood"],
        "PConc",
    ),
    ("BsmtQual", &["Ex", "Gd", "TA", "Fa", "Po", "NA"], "TA"),
    ("BsmtCond", &["Ex", "Gd", "TA", "Fa", "Po", "NA"], "TA"),
    ("BsmtExposure", &["Gd", "Av", "Mn", "No", "NA"], "No"),
    (
        "BsmtFinType1",
        &["GLQ", "ALQ", "BLQ", "Rec", "LwQ", "Unf", "NA"],
        "Unf",
    ),
    (
        "BsmtFinType2",
        &["GLQ", "ALQ", "BLQ", "Rec", "LwQ", "Unf", "NA"],
        "Unf",
    ),
    (
        "Heating",
        &["Floor", "GasA", "GasW", "Grav", "OthW", "Wall"],
        "GasA",
    ),
    ("HeatingQC", &["Ex", "Gd", "TA", "Fa", "Po"], "Ex"),
    ("CentralAir", &["N", "Y"], "Y"),
    (
        "Electrical",
        &["SBrkr", "FuseA", "FuseF", "FuseP", "Mix"],
        "SBrkr",
    ),
    ("KitchenQual", &["Ex", "Gd", "TA", "Fa", "Po"], "TA"),
    (
        "Functional",
        &["Typ", "Min1", "Min2", "Mod", "Maj1", "Maj2", "Sev", "Sal"],
        "Typ",
    ),
    ("FireplaceQu", &["Ex", "Gd", "TA", "Fa", "Po", "NA"], "NA"),
    (
        "GarageType",
        &[
            "2Types", "Attchd", "Basment", "BuiltIn", "CarPort", "Detchd", "NA",
        ],
        "Attchd",
    ),
    ("GarageFinish", &["Fin", "RFn", "Unf", "NA"], "Unf"),
    ("GarageQual", &["Ex", "Gd", "TA", "Fa", "Po", "NA"], "TA"),
    ("GarageCond", &["Ex", "Gd", "TA", "Fa", "Po", "NA"], "TA"),
    ("PavedDrive", &["Y", "P", "N"], "Y"),
    ("PoolQC", &["Ex", "Gd", "TA", "Fa", "NA"], "NA"),
    ("Fence", &["GdPrv", "MnPrv", "GdWo", "MnWw", "NA"], "NA"),
    ("MiscFeature", &["Elev", "Gar2", "Othr", "Shed", "TenC", "NA"], "NA"),
    (
        "SaleType",
        &[
            "WD", "CWD", "VWD", "New", "COD", "Con", "ConLw", "ConLI", "ConLD", "Oth",
        ],
        "WD",
    ),
    (
        "SaleCondition",
        &["Normal", "Abnorml", "AdjLand", "Alloca", "Family", "Partial"],
        "Normal",
    ),
];

/// Normalizes user input into the complete feature vector the model expects.
pub fn build_feature_vector(details: &PropertyInput) -> FeatureVector {
    let bedrooms = parse_number(details.bedrooms.as_deref(), DEFAULT_BEDROOMS);
    let bathrooms = parse_number(details.bathrooms.as_deref(), DEFAULT_BATHROOMS);
    let sqft = parse_number(details.square_footage.as_deref(), DEFAULT_SQFT);
    let lot_area = parse_number(details.lot_size.as_deref(), sqft * LOT_SIZE_FACTOR);
    let year_built = parse_number(details.year_built.as_deref(), DEFAULT_YEAR_BUILT);
    let (full_bath, half_bath) = split_bathrooms(bathrooms);
    let quality = quality_score(details.condition.as_deref());

    let mut features: FeatureVector = NUMERIC_DEFAULTS.iter().copied().collect();
    for (column, levels, chosen) in CATEGORICAL_DEFAULTS {
        for level in *levels {
            let value = if level == chosen { 1.0 } else { 0.0 };
            features.insert(format!("{column}_{level}"), value);
        }
    }

    features.insert("LotArea", lot_area);
    features.insert("GrLivArea", sqft);
    features.insert("1stFlrSF", (sqft / 2.0).ceil());
    features.insert("2ndFlrSF", (sqft / 2.0).floor());
    features.insert("BedroomAbvGr", bedrooms);
    features.insert("FullBath", full_bath);
    features.insert("HalfBath", half_bath);
    features.insert("TotRmsAbvGrd", bedrooms + full_bath + 2.0);
    features.insert("OverallQual", quality);
    features.insert("YearBuilt", year_built);
    features.insert("YearRemodAdd", year_built);
    features.insert("GarageYrBlt", year_built);

    debug!(count = features.len(), "Built feature vector");
    features
}
