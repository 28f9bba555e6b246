use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// Review-of-systems outcome. Unknown or unreadable statuses are `None` at the
// record level, so only two variants exist.
str_enum!(SystemStatus {
    Unremarkable => "unremarkable",
    Abnormal => "abnormal",
});

str_enum!(ReviewSystem {
    General => "general",
    Ent => "ent",
    Neck => "neck",
    Head => "head",
    Eyes => "eyes",
    Chest => "chest",
});

str_enum!(TemperatureUnit {
    Fahrenheit => "F",
    Celsius => "C",
});

str_enum!(TemperatureMethod {
    Oral => "oral",
    Tympanic => "tympanic",
    Temporal => "temporal",
    Axillary => "axillary",
    Rectal => "rectal",
});

impl ReviewSystem {
    /// Fixed set of systems every record reports on, in form order.
    pub const ALL: [ReviewSystem; 6] = [
        ReviewSystem::General,
        ReviewSystem::Ent,
        ReviewSystem::Neck,
        ReviewSystem::Head,
        ReviewSystem::Eyes,
        ReviewSystem::Chest,
    ];
}

impl TemperatureUnit {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'F' => Some(Self::Fahrenheit),
            'C' => Some(Self::Celsius),
            _ => None,
        }
    }
}
