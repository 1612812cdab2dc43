use console::Term;
use std::io::{self, Write};

use crate::core::SessionRecord;
use crate::records::{Bin, Describe, Summary};
use crate::ui::StyleSheet;

const COLUMN_WIDTH: usize = 9;
const LABEL_WIDTH: usize = 12;
const BAR_WIDTH: usize = 40;

/// Line-oriented output for everything outside the game canvas.
pub struct Display {
    term: Term,
    styles: StyleSheet,
    text_width: usize,
}

impl Display {
    pub fn new(styles: StyleSheet, text_width: usize) -> Self {
        Self {
            term: Term::stdout(),
            styles,
            text_width,
        }
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        self.term.clear_screen()
    }

    pub fn show_title(&self, title: &str) -> io::Result<()> {
        let styled_title = self.styles.apply_style(title, "title");
        let border = "═".repeat(self.text_width);
        let styled_border = self.styles.apply_style(&border, "separator");

        writeln!(io::stdout(), "{}", styled_title)?;
        writeln!(io::stdout(), "{}", styled_border)?;
        writeln!(io::stdout())?;

        Ok(())
    }

    pub fn show_message(&self, message: &str, style: &str) -> io::Result<()> {
        let styled_message = self.styles.apply_style(message, style);
        writeln!(io::stdout(), "{}", styled_message)?;
        Ok(())
    }

    pub fn show_error(&self, error: &str) -> io::Result<()> {
        self.show_message(&format!("❌ {}", error), "error")
    }

    pub fn show_success(&self, message: &str) -> io::Result<()> {
        self.show_message(&format!("✅ {}", message), "success")
    }

    pub fn show_warning(&self, message: &str) -> io::Result<()> {
        self.show_message(&format!("⚠️ {}", message), "warning")
    }

    pub fn show_separator(&self) -> io::Result<()> {
        let separator = "━".repeat(self.text_width);
        let styled = self.styles.apply_style(&separator, "separator");
        writeln!(io::stdout(), "{}", styled)?;
        Ok(())
    }

    pub fn show_record(&self, record: &SessionRecord) -> io::Result<()> {
        writeln!(
            io::stdout(),
            "{} {} | Score {} | Level {} | Jumps {} | {:.2}s | Speed {}",
            self.styles.apply_style("Last run:", "label"),
            self.styles.theme_label(record.theme),
            self.styles.apply_style(&record.score.to_string(), "value"),
            record.level,
            record.total_jump,
            record.time_played,
            record.final_speed
        )
    }

    pub fn show_summary(&self, summary: &Summary) -> io::Result<()> {
        if summary.is_empty() {
            return self.show_message("No games recorded yet.", "info");
        }

        self.show_message(&format!("Games played: {}", summary.games), "heading")?;
        writeln!(io::stdout())?;

        writeln!(io::stdout(), "{}", self.styles.apply_style(&describe_header(), "label"))?;
        for (label, describe) in [
            ("Total Jump", &summary.total_jump),
            ("Score", &summary.score),
            ("Level", &summary.level),
        ] {
            writeln!(io::stdout(), "{}", describe_row(label, describe.as_ref()))?;
        }
        self.show_separator()?;

        self.show_message("Theme distribution", "heading")?;
        for share in &summary.theme_distribution {
            writeln!(
                io::stdout(),
                "   {} {:>4} games {:>6.1}%",
                self.styles.theme_column(share.theme, LABEL_WIDTH),
                share.games,
                share.percentage
            )?;
        }
        self.show_separator()?;

        self.show_message("Jump distribution", "heading")?;
        let tallest = summary.jump_distribution.iter().map(|b| b.count).max().unwrap_or(0);
        for bin in &summary.jump_distribution {
            writeln!(io::stdout(), "{}", histogram_row(bin, tallest))?;
        }
        self.show_separator()?;

        self.show_message("Score by theme", "heading")?;
        writeln!(io::stdout(), "{}", self.styles.apply_style(&describe_header(), "label"))?;
        for entry in &summary.score_by_theme {
            writeln!(io::stdout(), "{}", describe_row(entry.theme.id(), Some(&entry.score)))?;
        }
        self.show_separator()?;

        let correlation = match summary.jumps_time_correlation {
            Some(r) => format!("{:.3}", r),
            None => "n/a".to_string(),
        };
        writeln!(
            io::stdout(),
            "{} {}",
            self.styles.apply_style("Jumps vs time played (Pearson r):", "label"),
            self.styles.apply_style(&correlation, "value")
        )?;

        Ok(())
    }

    pub fn wait_for_enter(&self) -> io::Result<()> {
        let styled_prompt = self.styles.apply_style("Press Enter to continue...", "info");
        print!("{}", styled_prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(())
    }
}

/// `[start, end)` range, a bar scaled against `tallest`, then the count.
fn histogram_row(bin: &Bin, tallest: usize) -> String {
    let length = if tallest == 0 { 0 } else { bin.count * BAR_WIDTH / tallest };
    format!(
        "{:>8.1} - {:<8.1} {:<bar$} {}",
        bin.start,
        bin.end,
        "█".repeat(length),
        bin.count,
        bar = BAR_WIDTH
    )
}

fn describe_header() -> String {
    let mut line = format!("{:<width$}", "", width = LABEL_WIDTH);
    for name in ["count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
        line.push_str(&format!("{:>width$}", name, width = COLUMN_WIDTH));
    }
    line
}

fn describe_row(label: &str, describe: Option<&Describe>) -> String {
    let mut line = format!("{:<width$}", label, width = LABEL_WIDTH);
    let Some(d) = describe else {
        line.push_str(&format!("{:>width$}", 0, width = COLUMN_WIDTH));
        return line;
    };

    line.push_str(&format!("{:>width$}", d.count, width = COLUMN_WIDTH));
    let std = d.std.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "NaN".to_string());
    let cells = [
        format!("{:.2}", d.mean),
        std,
        format!("{:.2}", d.min),
        format!("{:.2}", d.q25),
        format!("{:.2}", d.median),
        format!("{:.2}", d.q75),
        format!("{:.2}", d.max),
    ];
    for cell in cells {
        line.push_str(&format!("{:>width$}", cell, width = COLUMN_WIDTH));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe_row_formatting() {
        let describe = Describe::from_values(&[1.0, 2.0, 3.0]).unwrap();
        let row = describe_row("Score", Some(&describe));

        assert!(row.starts_with("Score       "));
        let cells: Vec<&str> = row[12..].split_whitespace().collect();
        assert_eq!(cells, vec!["3", "2.00", "1.00", "1.00", "1.50", "2.00", "2.50", "3.00"]);
    }

    #[test]
    fn test_describe_row_single_value_has_no_std() {
        let describe = Describe::from_values(&[4.0]).unwrap();
        let row = describe_row("Level", Some(&describe));
        assert!(row.contains("NaN"));
    }

    #[test]
    fn test_histogram_row_scales_bar() {
        let bin = Bin { start: 0.0, end: 1.5, count: 2 };
        let row = histogram_row(&bin, 4);

        assert!(row.starts_with("     0.0 - 1.5      "));
        assert_eq!(row.matches('█').count(), BAR_WIDTH / 2);
        assert!(row.ends_with(" 2"));
        assert_eq!(histogram_row(&bin, 0).matches('█').count(), 0);
    }

    #[test]
    fn test_header_aligns_with_rows() {
        let describe = Describe::from_values(&[1.0, 2.0]).unwrap();
        assert_eq!(describe_header().len(), describe_row("Total Jump", Some(&describe)).len());
    }
}
