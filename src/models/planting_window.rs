use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantingCategory {
    Early,
    Normal,
    Late,
}

impl PlantingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantingCategory::Early => "Early",
            PlantingCategory::Normal => "Normal",
            PlantingCategory::Late => "Late",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            PlantingCategory::Early => Color::Yellow,
            PlantingCategory::Normal => Color::Green,
            PlantingCategory::Late => Color::LightBlue,
        }
    }

    pub fn all() -> &'static [PlantingCategory] {
        &[
            PlantingCategory::Early,
            PlantingCategory::Normal,
            PlantingCategory::Late,
        ]
    }
}

impl std::fmt::Display for PlantingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Calendar range recommended for sowing, as month/day pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantingWindow {
    pub start_month: u32,
    pub start_day: u32,
    pub end_month: u32,
    pub end_day: u32,
}

impl PlantingWindow {
    pub const fn new(start_month: u32, start_day: u32, end_month: u32, end_day: u32) -> Self {
        Self {
            start_month,
            start_day,
            end_month,
            end_day,
        }
    }

    /// Display text such as "June 10th - June 30th"
    pub fn display(&self) -> String {
        format!(
            "{} {} - {} {}",
            month_name(self.start_month),
            ordinal(self.start_day),
            month_name(self.end_month),
            ordinal(self.end_day)
        )
    }
}

impl std::fmt::Display for PlantingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}
