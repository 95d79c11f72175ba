//! Journal record types and the line format.

/// Separator used between journal fields.
pub const FIELD_SEPARATOR: &str = " | ";

/// Lifetime record for one creature found as a shiny.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub name: String,
    /// Rarity when first recorded; later finds never change it
    pub rarity: String,
    pub count: u64,
}

impl JournalEntry {
    pub fn to_line(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.name, FIELD_SEPARATOR, self.rarity, FIELD_SEPARATOR, self.count
        )
    }

    /// Parse a `name | rarity | count` line.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();
        let [name, rarity, count] = fields.as_slice() else {
            return None;
        };
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            rarity: rarity.to_string(),
            count: count.trim().parse().ok()?,
        })
    }
}
