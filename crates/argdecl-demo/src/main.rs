mod coords;

use std::net::Ipv4Addr;

use anyhow::{Context, Result};
use argdecl::{
    Registry, RegistrySchema, ScalarDef, SwitchState, ValueShape, VectorDef, scalar_ref,
    switch_ref, vector_ref,
};
use serde_json::{Map, Value, json};
use tracing_subscriber::{EnvFilter, fmt};

use crate::coords::{CartesianCodec, Coords, decode_labeled, encode_labeled};

/// Path of a JSON option schema to parse the arguments against instead.
const SCHEMA_ENV: &str = "ARGDECL_SCHEMA";

fn main() -> Result<()> {
    init_tracing();

    match std::env::var_os(SCHEMA_ENV) {
        Some(path) => run_schema(&path.to_string_lossy()),
        None => run_builtin(),
    }
}

fn run_builtin() -> Result<()> {
    let mut address = Ipv4Addr::LOCALHOST;
    let mut peers: Vec<Ipv4Addr> = Vec::new();
    let mut origin = Coords::default();
    let mut points: Vec<Coords> = Vec::new();
    let mut verbose = SwitchState::Omitted;
    let mut count = 0i32;
    let mut name = String::from("anonymous");

    let (consumed, output) = {
        let mut registry = Registry::builder()
            .option(
                scalar_ref("--address", &mut address)
                    .alias("-a")
                    .description("IPv4 address to bind"),
            )
            .option(
                vector_ref("--peers", &mut peers)
                    .quantifier(0, 4)
                    .description("Up to four peer addresses"),
            )
            .option(
                ScalarDef::borrowed_with("--origin", &mut origin, CartesianCodec)
                    .description("Origin as x=.. y=.. z=.., any axis order"),
            )
            .option(
                VectorDef::borrowed_with("--points", &mut points, CartesianCodec)
                    .token_width(1)
                    .decoder(decode_labeled)
                    .encoder(encode_labeled)
                    .quantifier(0, 2)
                    .description("Up to two points as (x;y;z)=(..;..;..)"),
            )
            .option(switch_ref("--verbose", &mut verbose).alias("-v"))
            .option(scalar_ref("--count", &mut count).alias("-c"))
            .option(scalar_ref("--name", &mut name))
            .build()
            .context("failed to declare options")?;

        let consumed = registry.parse_args().context("failed to parse arguments")?;
        tracing::debug!(consumed, "arguments parsed");
        let output = registry.output().context("failed to serialize options")?;
        (consumed, output)
    };

    println!("consumed: {consumed}");
    println!("output: {output}");
    println!("address: {address}");
    println!("peers: {}", join(&peers));
    println!("origin: {origin}");
    println!("points: {}", join(&points));
    println!("verbose: {}", verbose.is_specified());
    println!("count: {count}");
    println!("name: {name}");
    Ok(())
}

fn run_schema(path: &str) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read option schema {path}"))?;
    let mut registry = RegistrySchema::from_json(&text)
        .and_then(RegistrySchema::into_registry)
        .with_context(|| format!("invalid option schema {path}"))?;
    tracing::debug!(path, options = registry.len(), "schema loaded");

    let consumed = registry.parse_args().context("failed to parse arguments")?;

    let mut values = Map::new();
    for option in registry.options() {
        let value = match option.shape() {
            ValueShape::Switch => json!(option.switch_state()?.is_specified()),
            ValueShape::Scalar => json!(option.value::<String>()?),
            ValueShape::Vector => json!(option.items::<String>()?),
        };
        values.insert(option.key().to_string(), value);
    }

    println!("consumed: {consumed}");
    println!("output: {}", registry.output()?);
    println!("{}", serde_json::to_string_pretty(&Value::Object(values))?);
    Ok(())
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
