use crate::api::models::{Account, Group};
use crate::core::handler::ResultPage;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Formatter for account and group listings
pub struct TableDisplay {
    max_width: usize,
    use_colors: bool,
}

impl TableDisplay {
    /// Create a new TableDisplay sized to the terminal; colors only on a tty
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }

    fn detect_terminal_width() -> usize {
        terminal::size()
            .map(|(cols, _)| (cols as usize).clamp(40, 200))
            .unwrap_or(80)
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_width(self.max_width.saturating_sub(4).max(40) as u16);

        let header: Vec<Cell> = headers
            .iter()
            .map(|title| {
                let cell = Cell::new(title).add_attribute(Attribute::Bold);
                if self.use_colors {
                    cell.fg(Color::Cyan)
                } else {
                    cell
                }
            })
            .collect();
        table.set_header(header);
        table
    }

    /// Width budget of a free-text column
    fn column_width(&self, columns: usize) -> usize {
        (self.max_width / columns.max(1)).max(8)
    }

    pub fn render_accounts(&self, page: &ResultPage<Account>) -> String {
        let mut table = self.table(&["ID", "Username", "Name", "Email", "Enabled"]);
        let width = self.column_width(5);

        for account in page {
            let enabled = match account.enabled {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            };
            let enabled = if self.use_colors && account.enabled == Some(false) {
                Cell::new(enabled).fg(Color::DarkGrey)
            } else {
                Cell::new(enabled)
            };
            table.add_row(vec![
                Cell::new(fit(account.id.as_deref().unwrap_or("-"), width)),
                Cell::new(fit(&account.username, width)),
                Cell::new(fit(&account.full_name(), width)),
                Cell::new(fit(account.email.as_deref().unwrap_or("-"), width)),
                enabled,
            ]);
        }

        format!("{}\n{}", table, summary(page, "accounts"))
    }

    pub fn render_groups(&self, page: &ResultPage<Group>) -> String {
        let mut table = self.table(&["ID", "Name", "Path"]);
        let width = self.column_width(3);

        for group in page {
            table.add_row(vec![
                fit(group.id.as_deref().unwrap_or("-"), width),
                fit(&group.name, width),
                fit(group.path.as_deref().unwrap_or("-"), width),
            ]);
        }

        format!("{}\n{}", table, summary(page, "groups"))
    }

    /// Field/value table for a single account
    pub fn render_account(&self, account: &Account) -> String {
        let mut table = self.table(&["Field", "Value"]);
        let rows = [
            ("ID", account.id.clone()),
            ("Username", Some(account.username.clone())),
            ("Name", Some(account.full_name())),
            ("Email", account.email.clone()),
            ("Enabled", account.enabled.map(|e| e.to_string())),
        ];
        for (field, value) in rows {
            table.add_row(vec![field.to_string(), value.unwrap_or_else(|| "-".to_string())]);
        }
        table.to_string()
    }
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// One line describing which slice of the result set is shown.
pub fn summary<T>(page: &ResultPage<T>, noun: &str) -> String {
    let shown = page.len();
    if page.total() < 0 {
        return format!("{} {}", shown, noun);
    }
    let from = page.start().max(0);
    let mut line = format!("{} of {} {} (from {})", shown, page.total(), noun, from);
    if page.has_more() {
        line.push_str(", more available");
    }
    line
}

/// Cut `text` to `width` display columns, marking the cut with an ellipsis.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out: String = text
        .chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= budget
        })
        .collect();
    out.push(ELLIPSIS);
    out
}
