// SPDX-License-Identifier: Apache-2.0

// Loads a small service configuration with typed reads, the way an
// application that owns its config format would.

use pulljson::{decode, Decoder, DecoderConfig, ParseError};

const CONFIG: &str = r#"
{
    "service": "inventory",
    "listen": {"host": "0.0.0.0", "port": 8080},
    "workers": 4,
    "timeout_ms": 2500,
    "debug": false,
    "upstreams": [
        {"name": "db", "weight": 3},
        {"name": "cache", "weight": 1}
    ],
    "comment": "unknown keys are skipped"
}
"#;

#[derive(Debug, Default)]
struct Upstream {
    name: String,
    weight: u64,
}

#[derive(Debug, Default)]
struct Config {
    service: String,
    host: String,
    port: u64,
    workers: u64,
    timeout_ms: u64,
    debug: bool,
    upstreams: Vec<Upstream>,
}

fn read_listen(d: &mut Decoder<'_>, config: &mut Config) -> Result<(), ParseError> {
    d.open_object()?;
    while d.has_more() {
        match &*d.read_str()? {
            "host" => config.host = d.read_string()?,
            "port" => config.port = d.read_u64()?,
            _ => d.skip_value()?,
        }
    }
    d.close_object()
}

fn read_upstreams(d: &mut Decoder<'_>, config: &mut Config) -> Result<(), ParseError> {
    d.open_array()?;
    while d.has_more() {
        let mut upstream = Upstream::default();
        d.open_object()?;
        while d.has_more() {
            match &*d.read_str()? {
                "name" => upstream.name = d.read_string()?,
                "weight" => upstream.weight = d.read_u64()?,
                _ => d.skip_value()?,
            }
        }
        d.close_object()?;
        config.upstreams.push(upstream);
    }
    d.close_array()
}

fn load(json: &str) -> Result<Config, ParseError> {
    decode(json, |d| {
        let mut config = Config::default();
        d.open_object()?;
        while d.has_more() {
            match &*d.read_str()? {
                "service" => config.service = d.read_string()?,
                "listen" => read_listen(d, &mut config)?,
                "workers" => config.workers = d.read_u64()?,
                "timeout_ms" => config.timeout_ms = d.read_u64()?,
                "debug" => config.debug = d.read_bool()?,
                "upstreams" => read_upstreams(d, &mut config)?,
                _ => d.skip_value()?,
            }
        }
        d.close_object()?;
        Ok(config)
    })
}

fn main() {
    match load(CONFIG) {
        Ok(config) => println!("{:#?}", config),
        Err(err) => println!("config error: {}", err),
    }

    // Same loader, bad input: the first problem is reported with its offset
    match load(r#"{"service": "x", "workers": -1}"#) {
        Ok(config) => println!("unexpected success: {:?}", config),
        Err(err) => println!("config error: {}", err),
    }

    // Nesting is bounded per decoder
    let mut decoder = Decoder::with_config(DecoderConfig::new().max_depth(2));
    decoder.begin("[[[0]]]");
    for level in 1..=3 {
        if let Err(err) = decoder.open_array() {
            println!("level {}: {}", level, err);
            break;
        }
    }
    let _ = decoder.end();
}
