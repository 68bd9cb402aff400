//! End-to-end binding of `#[derive(Flags)]` structs into both registries.

use std::path::PathBuf;

use anyhow::{Result, anyhow, ensure};
use flagbind::{
    BindOptions, Bindable, ClapFlagSet, FlagSet, FlagValue, Flags, Reflect, ValueError, bind,
    bind_with,
};
use rstest::{fixture, rstest};

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
enum Format {
    #[default]
    Text,
    Json,
}

impl FlagValue for Format {
    fn type_name(&self) -> &'static str {
        "format"
    }

    fn assign(&mut self, raw: &str, _replace: bool) -> Result<(), ValueError> {
        *self = match raw {
            "text" => Self::Text,
            "json" => Self::Json,
            other => return Err(ValueError::new("format", other, "expected text or json")),
        };
        Ok(())
    }

    fn render(&self) -> String {
        match self {
            Self::Text => "text".into(),
            Self::Json => "json".into(),
        }
    }
}

impl Bindable for Format {
    fn reflect(&mut self) -> Reflect<'_> {
        Reflect::leaf(self)
    }
}

#[derive(Flags, Default, Debug)]
struct Logging {
    /// Minimum level to emit.
    #[flag(default = "info")]
    pub level: String,
    #[flag(default = "json")]
    pub format: Format,
}

#[derive(Flags, Default, Debug)]
struct Config {
    /// Address to listen on.
    #[flag(short = 'a', default = "127.0.0.1")]
    pub listen_addr: String,
    #[flag(name = "port", short = 'p', default = 8080, usage = "TCP port")]
    pub listen_port: u16,
    #[flag(short = 'v')]
    pub verbose: bool,
    #[flag(default = "alpha, beta")]
    pub tags: Vec<String>,
    pub timeout: Option<u64>,
    #[flag(default = -2)]
    pub offset: i32,
    pub output: PathBuf,
    #[flag(hidden, usage = "internal token")]
    pub token: String,
    #[flag(skip)]
    pub cache: Vec<u8>,
    #[flag(prefix = "log")]
    pub logging: Logging,
    connections: u32,
}

#[fixture]
fn config() -> Config {
    Config::default()
}

#[rstest]
fn defaults_from_attributes_are_applied(mut config: Config) -> Result<()> {
    bind(&mut config, &mut FlagSet::new("svc"))?;
    ensure!(config.listen_addr == "127.0.0.1", "addr = {}", config.listen_addr);
    ensure!(config.listen_port == 8080, "port = {}", config.listen_port);
    ensure!(config.tags == ["alpha", "beta"], "tags = {:?}", config.tags);
    ensure!(config.offset == -2, "offset = {}", config.offset);
    ensure!(config.timeout.is_none(), "timeout = {:?}", config.timeout);
    ensure!(config.token.is_empty() && config.cache.is_empty(), "untagged defaults");
    ensure!(config.logging.level == "info", "level = {}", config.logging.level);
    ensure!(config.logging.format == Format::Json, "format = {:?}", config.logging.format);
    Ok(())
}

#[rstest]
fn flag_names_usage_and_exclusions(mut config: Config) -> Result<()> {
    let mut flags = FlagSet::new("svc");
    bind(&mut config, &mut flags)?;
    let names: Vec<&str> = flags.iter().map(flagbind::Flag::name).collect();
    ensure!(
        names
            == [
                "listen-addr",
                "port",
                "verbose",
                "tags",
                "timeout",
                "offset",
                "output",
                "token",
                "log-level",
                "log-format",
            ],
        "names were {names:?}"
    );
    let usage = |name: &str| {
        flags
            .lookup(name)
            .map(|flag| flag.usage().to_owned())
            .ok_or_else(|| anyhow!("{name} missing"))
    };
    ensure!(usage("listen-addr")? == "Address to listen on.", "doc usage");
    ensure!(usage("port")? == "TCP port", "explicit usage");
    ensure!(usage("log-level")? == "Minimum level to emit.", "nested doc usage");
    ensure!(usage("verbose")?.is_empty(), "no usage without docs");
    let tags = flags
        .lookup("tags")
        .ok_or_else(|| anyhow!("tags missing"))?;
    ensure!(tags.default_value() == "alpha,beta", "recorded default {}", tags.default_value());
    ensure!(tags.value().type_name() == "strings", "type {}", tags.value().type_name());
    Ok(())
}

#[rstest]
fn standard_registry_parses_into_struct(mut config: Config) -> Result<()> {
    {
        let mut flags = FlagSet::new("svc");
        bind(&mut config, &mut flags)?;
        flags.parse([
            "-port=9090",
            "--verbose",
            "-tags",
            "x",
            "-tags=y,z",
            "-timeout",
            "30",
            "-log-format=text",
            "-output",
            "/tmp/out",
            "serve",
        ])?;
        ensure!(flags.args() == ["serve"], "positionals {:?}", flags.args());
    }
    ensure!(config.listen_port == 9090, "port = {}", config.listen_port);
    ensure!(config.verbose, "verbose should be set");
    ensure!(config.tags == ["x", "y", "z"], "tags = {:?}", config.tags);
    ensure!(config.timeout == Some(30), "timeout = {:?}", config.timeout);
    ensure!(config.logging.format == Format::Text, "format = {:?}", config.logging.format);
    ensure!(config.output == PathBuf::from("/tmp/out"), "output = {:?}", config.output);
    ensure!(config.connections == 0, "private field must stay untouched");
    Ok(())
}

#[rstest]
fn extended_registry_uses_shorthands(mut config: Config) -> Result<()> {
    {
        let mut flags = ClapFlagSet::new("svc");
        bind(&mut config, &mut flags)?;
        let token = flags
            .lookup("token")
            .ok_or_else(|| anyhow!("token missing"))?;
        ensure!(token.is_hidden(), "token should be hidden");
        flags.parse_from(["svc", "-a", "0.0.0.0", "-p", "1", "-v", "--log-level", "warn"])?;
    }
    ensure!(config.listen_addr == "0.0.0.0", "addr = {}", config.listen_addr);
    ensure!(config.listen_port == 1, "port = {}", config.listen_port);
    ensure!(config.verbose, "verbose should be set");
    ensure!(config.logging.level == "warn", "level = {}", config.logging.level);
    Ok(())
}

#[rstest]
fn custom_value_rejects_unknown_literal(mut config: Config) {
    let mut flags = FlagSet::new("svc");
    bind(&mut config, &mut flags).expect("bind config");
    let err = flags
        .set("log-format", "yaml")
        .expect_err("yaml is not a format");
    assert!(err.to_string().contains("expected text or json"), "{err}");
}

#[rstest]
fn root_prefix_applies_to_every_flag(mut config: Config) -> Result<()> {
    let mut flags = FlagSet::new("svc");
    bind_with(&mut config, &mut flags, &BindOptions::new().prefix("svc"))?;
    ensure!(flags.lookup("svc-port").is_some(), "prefixed port missing");
    ensure!(flags.lookup("svc-log-level").is_some(), "prefixed nested flag missing");
    ensure!(flags.lookup("port").is_none(), "unprefixed name registered");
    Ok(())
}

#[derive(Flags, Default)]
#[flag(crate = "flagbind")]
struct Explicit {
    pub count: u8,
}

#[test]
fn crate_path_attribute_resolves() -> Result<()> {
    let mut explicit = Explicit::default();
    {
        let mut flags = FlagSet::new("x");
        bind(&mut explicit, &mut flags)?;
        flags.parse(["-count", "4"])?;
    }
    ensure!(explicit.count == 4, "count = {}", explicit.count);
    Ok(())
}
