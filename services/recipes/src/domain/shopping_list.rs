use std::collections::BTreeMap;

/// Total amount of one `(ingredient name, unit)` group across a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Consolidated shopping list, one line per `(name, unit)`, ordered by name then unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    lines: Vec<ShoppingListLine>,
}

impl ShoppingList {
    /// Merge lines sharing `(name, unit)` by summing their amounts.
    pub fn from_lines(lines: impl IntoIterator<Item = ShoppingListLine>) -> Self {
        let mut groups: BTreeMap<(String, String), i64> = BTreeMap::new();
        for line in lines {
            *groups
                .entry((line.name, line.measurement_unit))
                .or_default() += line.amount;
        }
        let lines = groups
            .into_iter()
            .map(|((name, measurement_unit), amount)| ShoppingListLine {
                name,
                measurement_unit,
                amount,
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[ShoppingListLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain-text rendering: `{name} {amount} {unit}` per line.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{} {} {}\n", line.name, line.amount, line.measurement_unit))
            .collect()
    }
}
