// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use prettytable::{cell, format::consts::FORMAT_NO_LINESEP, row, table, Table};
use std::collections::HashMap;

pub trait Entity {
    type Id;

    fn get_id(&self) -> Self::Id;
    fn get_data(&self) -> HashMap<String, String> {
        Default::default()
    }
}

pub trait ToTable {
    fn to_table(&self) -> Table;
}

impl<I: ToString, E: Entity<Id = I>> ToTable for E {
    fn to_table(&self) -> Table {
        let mut table = table![["id", self.get_id()]];

        // Sorted so the same entity always renders the same table
        let mut data: Vec<_> = self.get_data().into_iter().collect();
        data.sort();

        for (key, val) in data {
            table.add_row(row![key, val]);
        }

        table.set_format(*FORMAT_NO_LINESEP);
        table
    }
}

impl<K, V, B> ToTable for HashMap<K, V, B>
where
    K: ToString,
    V: ToString,
{
    fn to_table(&self) -> Table {
        let mut rows: Vec<_> = self
            .iter()
            .map(|(key, val)| (key.to_string(), val.to_string()))
            .collect();
        rows.sort();

        let mut table = Table::new();
        for (key, val) in rows {
            table.add_row(row![key, val]);
        }

        table.set_format(*FORMAT_NO_LINESEP);
        table
    }
}

impl ToTable for crate::review::CompanyRatingSnapshot {
    fn to_table(&self) -> Table {
        let mut table = table![
            ["average_rating", format!("{:.2}", self.average_rating)],
            ["total_review_count", self.total_review_count]
        ];

        let mut categories: Vec<_> = self
            .category_averages
            .iter()
            .map(|(category, avg)| (category.to_string(), format!("{:.2}", avg)))
            .collect();
        categories.sort();

        for (category, avg) in categories {
            table.add_row(row![category, avg]);
        }

        table.add_row(row!["computed_at", self.computed_at.to_rfc3339()]);
        table.set_format(*FORMAT_NO_LINESEP);
        table
    }
}
