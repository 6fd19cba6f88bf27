//! CLI argument definitions

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "alloctop",
    about = "Control the kernel alloc-top sampler and export its records",
    after_help = "\
EXAMPLES:
    alloctop --activate=top=50,verbose=1       Enable, keep the 50 largest allocators
    alloctop --settings=json=1                 Dump current settings as JSON
    alloctop --report                          One-shot table of sampled records
    alloctop --log=sls=/tmp/1.log,syslog=1     Export records every 10 seconds"
)]
pub struct Args {
    /// Enable the sampler (options: top=N,verbose=V)
    #[arg(long, value_name = "OPTS", num_args = 0..=1, require_equals = true, default_missing_value = "")]
    pub activate: Option<String>,

    /// Disable the sampler
    #[arg(long)]
    pub deactivate: bool,

    /// Print the current sampler settings (options: json=1)
    #[arg(long, value_name = "OPTS", num_args = 0..=1, require_equals = true, default_missing_value = "")]
    pub settings: Option<String>,

    /// One-shot dump of sampled records as a fixed-width table
    #[arg(long)]
    pub report: bool,

    /// Export records continuously (options: sls=/path/file,syslog=1)
    #[arg(long, value_name = "OPTS", require_equals = true)]
    pub log: Option<String>,

    /// Use the raw syscall path instead of the ioctl control device
    #[arg(long)]
    pub syscall: bool,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn unrecognized_option_is_a_recoverable_parse_error() {
        // main() prints usage and still exits 0 on this
        let err = Args::try_parse_from(["alloctop", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn optional_argument_options_take_the_equals_form() {
        let args = Args::try_parse_from(["alloctop", "--activate=top=5,verbose=1"]).unwrap();
        assert_eq!(args.activate.as_deref(), Some("top=5,verbose=1"));
    }

    #[test]
    fn bare_optional_argument_option_reads_as_empty() {
        let args = Args::try_parse_from(["alloctop", "--settings"]).unwrap();
        assert_eq!(args.settings.as_deref(), Some(""));
    }
}
