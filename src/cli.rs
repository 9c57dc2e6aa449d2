use crate::camera_config::{ConfigLayer, CredentialLayer};
use crate::version::version_string;
use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn build_cli() -> Command {
    Command::new("pistream")
        .version(version_string())
        .about("Configures a V4L2 capture device and streams it to an RTMP ingest endpoint.")
        .arg(
            Arg::new("key")
                .short('k')
                .long("key")
                .value_name("KEY")
                .help("Stream key for the ingest endpoint")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("conf")
                .short('c')
                .long("conf")
                .value_name("FILE")
                .help("Configuration file (JSON, or YAML with a .yaml/.yml extension)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// The only configuration the command line can set is the stream key.
pub fn cli_layer(matches: &ArgMatches) -> ConfigLayer {
    ConfigLayer {
        periscope: CredentialLayer::from_key(
            matches.get_one::<String>("key").map(String::as_str),
        ),
        ..Default::default()
    }
}
