use chrono::Utc;
use engine::setup::Signal;

/// Renders a price without scientific notation or trailing zeros, so
/// sub-cent alts ("0.0000412") and majors ("43250.5") both read cleanly.
pub fn fmt_price(x: f64) -> String {
    let s = format!("{x:.8}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// One line per alert. The symbol is bolded because dispatch goes out with
/// HTML parse mode.
pub fn alert_text(symbol: &str, signal: &Signal) -> String {
    format!(
        "[{}] <b>{}</b> | RSI {:.1} | Vol {:.1}x | px {}",
        signal.kind,
        symbol,
        signal.rsi,
        signal.volume_ratio,
        fmt_price(signal.price)
    )
}

pub fn startup_text(universe_len: usize) -> String {
    format!(
        "scanner online | {} pairs | {}",
        universe_len,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::setup::SetupKind;

    #[test]
    fn test_fmt_price_trims_trailing_zeros() {
        assert_eq!(fmt_price(1.23), "1.23");
        assert_eq!(fmt_price(1.230000004), "1.23");
        assert_eq!(fmt_price(0.000123), "0.000123");
    }

    #[test]
    fn test_fmt_price_keeps_integers_bare() {
        assert_eq!(fmt_price(5.0), "5");
        assert_eq!(fmt_price(43250.0), "43250");
    }

    #[test]
    fn test_fmt_price_zero() {
        assert_eq!(fmt_price(0.0), "0");
    }

    #[test]
    fn test_alert_text_carries_the_readings() {
        let signal = Signal {
            kind: SetupKind::SmallCapBreakout,
            price: 0.04120000,
            rsi: 61.37,
            volume_ratio: 2.44,
        };

        let text = alert_text("PEPEUSDT", &signal);
        assert_eq!(text, "[SMALL] <b>PEPEUSDT</b> | RSI 61.4 | Vol 2.4x | px 0.0412");
    }

    #[test]
    fn test_startup_text_counts_the_universe() {
        let text = startup_text(80);
        assert!(text.starts_with("scanner online | 80 pairs | "));
        assert!(text.ends_with(" UTC"));
    }
}
