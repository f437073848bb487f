use chrono::{Datelike, NaiveDate};

use fin_domain::{Amount, BatchStatus, Tier, TransactionKind};

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Amount) -> String;

    /// Short form for dashboards. Defaults to the full form.
    fn format_compact(&self, amount: Amount) -> String {
        self.format_amount(amount)
    }
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
    fn format_short(&self, date: NaiveDate) -> String;
}

/// Whole-rupiah formatter: `Rp 4.442.000`, `-Rp 980.000`, compact `Rp 4.4jt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RupiahFormatter {
    symbol: String,
    grouping: char,
}

impl Default for RupiahFormatter {
    fn default() -> Self {
        Self::for_locale("id-ID")
    }
}

impl RupiahFormatter {
    const MILLION: Amount = 1_000_000;

    /// `.` groups thousands for Indonesian locales, `,` for everything else.
    pub fn for_locale(locale: &str) -> Self {
        let indonesian = locale
            .split(|c: char| c == '-' || c == '_')
            .next()
            .map(|lang| lang.eq_ignore_ascii_case("id"))
            .unwrap_or(false);
        Self {
            symbol: "Rp".to_string(),
            grouping: if indonesian { '.' } else { ',' },
        }
    }

    pub fn grouping(&self) -> char {
        self.grouping
    }

    fn group_digits(&self, value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                out.push(self.grouping);
            }
            out.push(ch);
        }
        out
    }
}

impl CurrencyFormatter for RupiahFormatter {
    fn format_amount(&self, amount: Amount) -> String {
        let grouped = self.group_digits(amount.unsigned_abs());
        if amount < 0 {
            format!("-{} {}", self.symbol, grouped)
        } else {
            format!("{} {}", self.symbol, grouped)
        }
    }

    fn format_compact(&self, amount: Amount) -> String {
        let magnitude = amount.unsigned_abs();
        if magnitude < Self::MILLION as u64 {
            return self.format_amount(amount);
        }
        // one decimal, rounded half up
        let tenths = (magnitude + 50_000) / 100_000;
        let sign = if amount < 0 { "-" } else { "" };
        let whole = tenths / 10;
        if tenths % 10 == 0 {
            format!("{} {}{}jt", self.symbol, sign, whole)
        } else {
            format!("{} {}{}.{}jt", self.symbol, sign, whole, tenths % 10)
        }
    }
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// `5 Feb 2026` / `5 Feb` with Indonesian month abbreviations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndonesianDateFormatter;

impl IndonesianDateFormatter {
    fn month(date: NaiveDate) -> &'static str {
        MONTHS[date.month0() as usize]
    }
}

impl DateFormatter for IndonesianDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        format!("{} {} {}", date.day(), Self::month(date), date.year())
    }

    fn format_short(&self, date: NaiveDate) -> String {
        format!("{} {}", date.day(), Self::month(date))
    }
}

/// Signed Indonesian label, e.g. `+ Pemasukan` or `- Setor Reserve`.
pub fn kind_label(kind: TransactionKind) -> String {
    let label = match kind {
        TransactionKind::Income => "Pemasukan",
        TransactionKind::Expense => "Pengeluaran",
        TransactionKind::ReserveIn => "Setor Reserve",
        TransactionKind::ReserveOut => "Tarik Reserve",
    };
    format!("{} {}", kind.sign(), label)
}

/// Tier names are shown untranslated.
pub fn tier_label(tier: Tier) -> String {
    tier.to_string()
}

pub fn status_label(status: BatchStatus) -> String {
    match status {
        BatchStatus::Planned => "Planned",
        BatchStatus::Active => "Aktif",
        BatchStatus::Archived => "Arsip",
    }
    .to_string()
}
