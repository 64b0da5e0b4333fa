//! Provenance strings recorded in the header of every generated file.

use crate::config::{Flags, DEFAULT_DECODER};

/// Name of the generating program as written in the provenance header
pub const PROGRAM: &str = "genwith";

/// Record the raw command-line arguments (program name excluded) verbatim
pub fn summarize_args<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| arg.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reconstruct an equivalent command line for flags that did not come from argv
pub fn summarize_flags(flags: &Flags) -> String {
    let switches = [
        (flags.include_do, "--do"),
        (flags.include_token, "--token"),
        (flags.include_config, "--config"),
        (flags.include_endpoint_value, "--endpoint"),
        (flags.include_endpoint_func, "--endpoint-func"),
        (flags.include_client, "--client"),
        (flags.include_rate_limiter, "--ratelimit"),
    ];

    let mut args: Vec<String> = switches
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| name.to_string())
        .collect();
    args.push("--package".to_string());
    args.push(flags.package.trim().to_string());
    if flags.decoder_name() != DEFAULT_DECODER {
        args.push("--decoder".to_string());
        args.push(flags.decoder_name().to_string());
    }
    summarize_args(args)
}

/// The file a package's generated code is written to
pub fn output_file_name(package: &str) -> String {
    format!("{package}_with.go")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_args() {
        let args = ["--config", "--endpoint", "--package", "acme"];
        assert_eq!(summarize_args(args), "--config --endpoint --package acme");
        assert_eq!(summarize_args(Vec::<String>::new()), "");
    }

    #[test]
    fn test_summarize_flags() {
        let flags = Flags {
            include_do: true,
            include_client: true,
            package: "weather".to_string(),
            decoder: Some("xml".to_string()),
            ..Default::default()
        };
        assert_eq!(
            summarize_flags(&flags),
            "--do --client --package weather --decoder xml"
        );
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("acme"), "acme_with.go");
    }
}
