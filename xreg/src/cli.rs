use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;
use xreg_format::ValueType;

use crate::dns::DnsMode;

#[derive(Debug)]
pub struct ParseValueTypeError(String);

impl std::error::Error for ParseValueTypeError {}

impl std::fmt::Display for ParseValueTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown value type: {} (expected one of: {})",
            self.0,
            ValueType::available_variants().join(", ")
        )
    }
}

fn parse_value_type(src: &str) -> std::result::Result<ValueType, ParseValueTypeError> {
    let value_type = match src {
        "bool" | "boolean" => ValueType::Bool,
        "int" | "integer" => ValueType::Integer,
        "string" | "str" => ValueType::String,
        _ => return Err(ParseValueTypeError(src.to_string())),
    };

    Ok(value_type)
}

#[derive(Debug, StructOpt)]
pub enum Commands {
    #[structopt(name = "list", visible_alias = "l", about = "List registry keys and values")]
    List {
        #[structopt(long, help = "Print entries as JSON")]
        json: bool,

        #[structopt(long, help = "Also list values that belong to no key")]
        orphans: bool,
    },

    #[structopt(name = "get", about = "Print the value of one key")]
    Get {
        #[structopt(help = "Registry key, e.g. /setting/net/primaryDns")]
        key: String,
    },

    #[structopt(name = "set", about = "Overwrite the value of one key in place")]
    Set {
        #[structopt(
            short = "t",
            long = "type",
            parse(try_from_str = parse_value_type),
            default_value = "string",
            help = "Type stored in the slot: bool, int or string"
        )]
        value_type: ValueType,

        #[structopt(help = "Registry key, e.g. /setting/net/primaryDns")]
        key: String,

        #[structopt(help = "New value. Must fit the existing slot")]
        value: String,
    },

    #[structopt(name = "dns", about = "Show or change the network DNS settings")]
    Dns {
        #[structopt(subcommand)]
        cmd: DnsCommand,
    },

    #[structopt(name = "profile", about = "Manage stored DNS profiles")]
    Profile {
        #[structopt(subcommand)]
        cmd: ProfileCommand,
    },
}

#[derive(Debug, StructOpt)]
pub enum DnsCommand {
    #[structopt(name = "show", about = "Print the DNS mode and addresses")]
    Show {
        #[structopt(long, help = "Print as JSON")]
        json: bool,
    },

    #[structopt(name = "set", about = "Change the DNS mode and addresses")]
    Set {
        #[structopt(short, long, help = "automatic or manual")]
        mode: Option<DnsMode>,

        #[structopt(long, help = "Primary DNS address; empty to clear")]
        primary: Option<String>,

        #[structopt(long, help = "Secondary DNS address; empty to clear")]
        secondary: Option<String>,
    },
}

#[derive(Debug, StructOpt)]
pub enum ProfileCommand {
    #[structopt(name = "list", visible_alias = "l", about = "List stored profiles")]
    List,

    #[structopt(name = "add", about = "Store a new profile")]
    Add {
        name: String,
        primary: String,
        secondary: String,
    },

    #[structopt(name = "remove", visible_alias = "rm", about = "Remove a stored profile")]
    Remove { name: String },

    #[structopt(
        name = "apply",
        about = "Write a profile's DNS settings to the registry"
    )]
    Apply { name: String },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "xreg",
    about = "Inspect and edit xRegistry.sys files and manage DNS profiles.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands]
)]
pub struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    pub verbose: bool,

    #[structopt(
        short,
        long,
        env = "XREG_PATH",
        default_value = "/dev_flash2/etc/xRegistry.sys",
        parse(from_os_str),
        help = "Path to the registry file"
    )]
    pub registry: PathBuf,

    #[structopt(
        short,
        long,
        env = "XREG_PROFILES",
        default_value = "/dev_hdd0/tmp/ezDNS.csv",
        parse(from_os_str),
        help = "Path to the DNS profiles CSV"
    )]
    pub profiles: PathBuf,

    #[structopt(subcommand)]
    pub cmd: Commands,
}
