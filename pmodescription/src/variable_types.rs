use std::{fmt, str::FromStr};

/// Types de données UPnP déclarés dans `<dataType>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateVarType {
    UI1,        // Unsigned 8-bit integer
    UI2,        // Unsigned 16-bit integer
    UI4,        // Unsigned 32-bit integer
    UI8,        // Unsigned 64-bit integer
    I1,         // Signed 8-bit integer
    I2,         // Signed 16-bit integer
    I4,         // Signed 32-bit integer
    I8,         // Signed 64-bit integer
    Int,        // Synonymous with i4
    R4,         // 32-bit floating point
    R8,         // 64-bit floating point
    Number,     // Synonymous with r8
    Fixed14_4,  // Fixed-point decimal
    Float,      // Floating point
    Char,       // Single Unicode character
    String,     // Character string
    Boolean,    // Boolean value
    BinBase64,  // Base64-encoded binary
    BinHex,     // Hex-encoded binary
    Date,       // Date (YYYY-MM-DD)
    DateTime,   // DateTime without timezone
    DateTimeTZ, // DateTime with timezone
    Time,       // Time without timezone
    TimeTZ,     // Time with timezone
    UUID,       // Universally unique identifier
    URI,        // Uniform Resource Identifier
}

impl StateVarType {
    /// Interprète un nom de type UPnP.
    ///
    /// La comparaison ignore la casse et les espaces. Un nom inconnu donne
    /// `None` : c'est au générateur de choisir un type de repli.
    pub fn from_data_type(name: &str) -> Option<Self> {
        let t = match name.trim().to_ascii_lowercase().as_str() {
            "ui1" => StateVarType::UI1,
            "ui2" => StateVarType::UI2,
            "ui4" => StateVarType::UI4,
            "ui8" => StateVarType::UI8,
            "i1" => StateVarType::I1,
            "i2" => StateVarType::I2,
            "i4" => StateVarType::I4,
            "i8" => StateVarType::I8,
            "int" => StateVarType::Int,
            "r4" => StateVarType::R4,
            "r8" => StateVarType::R8,
            "number" => StateVarType::Number,
            "fixed.14.4" => StateVarType::Fixed14_4,
            "float" => StateVarType::Float,
            "char" => StateVarType::Char,
            "string" => StateVarType::String,
            "boolean" => StateVarType::Boolean,
            "bin.base64" => StateVarType::BinBase64,
            "bin.hex" => StateVarType::BinHex,
            "date" => StateVarType::Date,
            "datetime" => StateVarType::DateTime,
            "datetime.tz" => StateVarType::DateTimeTZ,
            "time" => StateVarType::Time,
            "time.tz" => StateVarType::TimeTZ,
            "uuid" => StateVarType::UUID,
            "uri" => StateVarType::URI,
            _ => return None,
        };
        Some(t)
    }

    /// Nom canonique du type tel qu'il apparaît dans un SCPD.
    pub fn data_type_name(self) -> &'static str {
        match self {
            StateVarType::UI1 => "ui1",
            StateVarType::UI2 => "ui2",
            StateVarType::UI4 => "ui4",
            StateVarType::UI8 => "ui8",
            StateVarType::I1 => "i1",
            StateVarType::I2 => "i2",
            StateVarType::I4 => "i4",
            StateVarType::I8 => "i8",
            StateVarType::Int => "int",
            StateVarType::R4 => "r4",
            StateVarType::R8 => "r8",
            StateVarType::Number => "number",
            StateVarType::Fixed14_4 => "fixed.14.4",
            StateVarType::Float => "float",
            StateVarType::Char => "char",
            StateVarType::String => "string",
            StateVarType::Boolean => "boolean",
            StateVarType::BinBase64 => "bin.base64",
            StateVarType::BinHex => "bin.hex",
            StateVarType::Date => "date",
            StateVarType::DateTime => "dateTime",
            StateVarType::DateTimeTZ => "dateTime.tz",
            StateVarType::Time => "time",
            StateVarType::TimeTZ => "time.tz",
            StateVarType::UUID => "uuid",
            StateVarType::URI => "uri",
        }
    }

    pub fn bit_size(self) -> Option<usize> {
        match self {
            StateVarType::UI1 | StateVarType::I1 => Some(8),
            StateVarType::UI2 | StateVarType::I2 => Some(16),
            StateVarType::UI4 | StateVarType::I4 | StateVarType::Int | StateVarType::R4 => Some(32),
            StateVarType::UI8
            | StateVarType::I8
            | StateVarType::R8
            | StateVarType::Number
            | StateVarType::Fixed14_4
            | StateVarType::Float => Some(64),
            _ => None,
        }
    }

    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            StateVarType::I1
                | StateVarType::I2
                | StateVarType::I4
                | StateVarType::I8
                | StateVarType::Int
        )
    }

    pub fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            StateVarType::UI1 | StateVarType::UI2 | StateVarType::UI4 | StateVarType::UI8
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            StateVarType::R4
                | StateVarType::R8
                | StateVarType::Number
                | StateVarType::Fixed14_4
                | StateVarType::Float
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_time(self) -> bool {
        matches!(
            self,
            StateVarType::Date
                | StateVarType::DateTime
                | StateVarType::DateTimeTZ
                | StateVarType::Time
                | StateVarType::TimeTZ
        )
    }

    pub fn is_binary(self) -> bool {
        matches!(self, StateVarType::BinBase64 | StateVarType::BinHex)
    }

    /// Types pouvant donner lieu à une énumération quand une
    /// `allowedValueList` est déclarée.
    pub fn is_enumerable(self) -> bool {
        matches!(self, StateVarType::String)
    }
}

impl fmt::Display for StateVarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.data_type_name())
    }
}

impl FromStr for StateVarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_data_type(s).ok_or_else(|| format!("Type inconnu: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(StateVarType::from_data_type(" dateTime.TZ "), Some(StateVarType::DateTimeTZ));
        assert_eq!(StateVarType::from_data_type("UI1"), Some(StateVarType::UI1));
        assert_eq!(StateVarType::from_data_type("vendor-type"), None);
    }

    #[test]
    fn test_display_round_trips() {
        for name in ["ui1", "i4", "fixed.14.4", "bin.base64", "dateTime", "uri"] {
            let t: StateVarType = name.parse().unwrap();
            assert_eq!(t.to_string(), name);
        }
    }

    #[test]
    fn test_classification() {
        assert!(StateVarType::UI1.is_unsigned_int());
        assert_eq!(StateVarType::UI1.bit_size(), Some(8));
        assert!(StateVarType::Int.is_signed_int());
        assert!(StateVarType::Number.is_float());
        assert!(StateVarType::String.is_enumerable());
        assert!(!StateVarType::BinHex.is_enumerable());
        assert!(StateVarType::Time.is_time());
    }
}
