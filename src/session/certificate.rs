use chrono::NaiveDate;

pub const TITLE: &str = "Certificate of Completion";
pub const CERTIFIES: &str = "This certifies that";
pub const ACHIEVEMENT: &str = "has successfully completed all Parsons Problems!";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Certificate {
    pub name: String,
    pub date: NaiveDate,
    pub instructor: String,
}

impl Certificate {
    pub fn issue(name: &str, date: NaiveDate, instructor: &str) -> Self {
        Self {
            name: name.to_string(),
            date,
            instructor: instructor.to_string(),
        }
    }

    pub fn issue_today(name: &str, instructor: &str) -> Self {
        Self::issue(name, chrono::Local::now().date_naive(), instructor)
    }

    /// e.g. "October 19, 2026"
    pub fn long_date(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }

    /// Plain-text rendition used for printing and the saved copy.
    pub fn to_text(&self, width: usize) -> String {
        let rule = "=".repeat(width);
        let center = |s: &str| {
            let len = s.chars().count();
            let pad = width.saturating_sub(len) / 2;
            format!("{}{}", " ".repeat(pad), s)
        };
        let date = format!("Date: {}", self.long_date());
        let signature = format!("Signature: {}", self.instructor);

        [
            rule.clone(),
            String::new(),
            center("\u{1f3c6}"),
            center(TITLE),
            String::new(),
            center(CERTIFIES),
            String::new(),
            center(&self.name),
            String::new(),
            center(ACHIEVEMENT),
            String::new(),
            center(&date),
            center(&signature),
            String::new(),
            rule,
        ]
        .join("\n")
            + "\n"
    }

    pub fn file_name(&self) -> String {
        let name: String = self
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}-{name}.txt", self.date.format("%Y-%m-%d"))
    }
}
