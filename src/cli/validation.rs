use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid page, pages start at 1".to_string());
        }
    }
    if let Some(per_page) = args.per_page {
        crate::table::PageSize::from_count(per_page).ok_or_else(|| {
            format!("invalid --per-page {per_page}, expected 5, 10, 15 or 20")
        })?;
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive number of seconds".to_string());
        }
    }
    for raw in args.export.iter() {
        crate::export::parse_format_list(raw).map_err(|e| format!("invalid --export '{raw}': {e}"))?;
    }
    if let Some(raw) = args.date_format.as_deref() {
        crate::model::DateStyle::new(raw).map_err(|e| format!("invalid --date-format: {e}"))?;
    }
    if args.url.is_some() && args.input.is_some() {
        return Err("use either --url or --input, not both".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["datatable"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&args(&[])).is_ok());
    }

    #[test]
    fn rejects_page_zero() {
        assert!(validate(&args(&["--page", "0"])).is_err());
    }

    #[test]
    fn rejects_unsupported_page_size() {
        assert!(validate(&args(&["--per-page", "12"])).is_err());
        assert!(validate(&args(&["--per-page", "20"])).is_ok());
    }

    #[test]
    fn rejects_unknown_export_format() {
        assert!(validate(&args(&["--export", "pdf,docx"])).is_err());
        assert!(validate(&args(&["-e", "pdf", "-e", "all"])).is_ok());
    }

    #[test]
    fn rejects_zero_timeout_and_bad_date_format() {
        assert!(validate(&args(&["--timeout", "0"])).is_err());
        assert!(validate(&args(&["--date-format", "%Q"])).is_err());
    }

    #[test]
    fn rejects_url_with_input() {
        assert!(validate(&args(&["-u", "http://x/data", "-i", "data.json"])).is_err());
    }
}
