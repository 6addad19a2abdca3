use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(limit) = args.limit {
        if limit == 0 {
            return Err("invalid limit, expected positive integer".to_string());
        }
    }
    if let Some(max_id) = args.max_id {
        if max_id == 0 {
            return Err("invalid max-id, expected positive integer".to_string());
        }
    }
    if let Some(open) = args.open {
        if open == 0 {
            return Err("invalid open, cards are numbered from 1".to_string());
        }
    }
    if args.open.is_some() && args.search.is_some() {
        return Err("use either --open or --search, not both".to_string());
    }
    if let Some(raw) = args.output_format.as_deref() {
        crate::output::OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid --output-format '{raw}', expected text, json or html"))?;
    }
    if let Some(raw) = args.locale.as_deref() {
        crate::view::Locale::parse(raw)
            .ok_or_else(|| format!("invalid --locale '{raw}', expected en or pl"))?;
    }
    if let Some(rate) = args.rate {
        if rate == 0 {
            return Err("invalid rate, expected positive integer".to_string());
        }
    }
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 {
            return Err("invalid concurrency, expected positive integer".to_string());
        }
    }
    if let Some(api_url) = args.api_url.as_deref() {
        if reqwest::Url::parse(api_url).is_err() {
            return Err(format!("invalid --api-url '{api_url}'"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> CliArgs {
        let mut full = vec!["gamedex"];
        full.extend_from_slice(argv);
        CliArgs::parse_from(full)
    }

    #[test]
    fn accepts_defaults() {
        assert!(validate(&parse(&[])).is_ok());
    }

    #[test]
    fn rejects_zero_values() {
        assert!(validate(&parse(&["--limit", "0"])).is_err());
        assert!(validate(&parse(&["--open", "0"])).is_err());
        assert!(validate(&parse(&["--rate", "0"])).is_err());
    }

    #[test]
    fn rejects_open_with_search() {
        let err = validate(&parse(&["--open", "2", "-s", "pika"])).unwrap_err();
        assert!(err.contains("not both"));
    }

    #[test]
    fn rejects_unknown_format_and_locale() {
        assert!(validate(&parse(&["--of", "xml"])).is_err());
        assert!(validate(&parse(&["--locale", "de"])).is_err());
        assert!(validate(&parse(&["--output-format", "json", "--locale", "pl"])).is_ok());
    }
}
