use std::net::Ipv4Addr;

use argdecl::{
    Error, OptionValue, ParsingPolicy, Quantifier, Registry, ScalarDef, SwitchState, ValueCodec,
    scalar, scalar_ref, switch, switch_ref, vector, vector_ref,
};

#[derive(Debug, Clone, PartialEq)]
struct NamedInt {
    name: String,
    value: i32,
}

impl OptionValue for NamedInt {
    const TOKEN_WIDTH: usize = 2;

    fn decode_tokens(tokens: &[String]) -> Result<Self, String> {
        let [name, value] = tokens else {
            return Err(format!("expected 2 tokens, got {}", tokens.len()));
        };
        let value = value
            .parse()
            .map_err(|e| format!("'{value}' is not a number: {e}"))?;
        Ok(Self {
            name: name.clone(),
            value,
        })
    }

    fn encode_value(&self, out: &mut String) -> Result<(), String> {
        out.push_str(&format!("{} {}", self.name, self.value));
        Ok(())
    }
}

fn named(name: &str, value: i32) -> NamedInt {
    NamedInt {
        name: name.to_string(),
        value,
    }
}

#[test]
fn every_key_and_alias_resolves_to_one_option() {
    let registry = Registry::builder()
        .option(switch("--verbose").alias("-v"))
        .option(scalar("--level", 1u8).alias("-l"))
        .option(vector::<String>("--tags", Vec::new()))
        .build()
        .unwrap();

    for key in ["--verbose", "-v", "--level", "-l", "--tags"] {
        assert!(registry.has(key), "missing {key}");
    }
    assert_eq!(registry.get("-l").unwrap().key(), "--level");
    assert_eq!(registry.get("-v").unwrap().alias(), Some("-v"));
}

#[test]
fn untouched_options_keep_defaults() {
    let mut registry = Registry::builder()
        .option(scalar("--count", 7i64))
        .option(scalar("--name", String::from("anon")))
        .option(switch("--quiet"))
        .build()
        .unwrap();
    registry.parse(["--name", "bob"]).unwrap();

    assert_eq!(*registry.value::<i64>("--count").unwrap(), 7);
    assert_eq!(registry.value::<String>("--name").unwrap(), "bob");
    assert_eq!(registry.switch_state("--quiet").unwrap(), SwitchState::Omitted);
}

#[test]
fn vector_respects_quantifier() {
    let build = || {
        Registry::builder()
            .option(vector::<String>("--files", Vec::new()).bounds(Quantifier::new(3, 5)))
            .build()
            .unwrap()
    };

    let mut registry = build();
    assert_eq!(registry.parse(["--files", "a", "b", "c"]).unwrap(), 4);
    assert_eq!(registry.items::<String>("--files").unwrap().len(), 3);

    let mut registry = build();
    let err = registry.parse(["--files", "a", "b"]).unwrap_err();
    match err {
        Error::InsufficientVectorItems { key, got, min } => {
            assert_eq!(key, "--files");
            assert_eq!(got, 2);
            assert_eq!(min, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Items beyond the maximum become candidate keys and are skipped.
    let mut registry = build();
    let consumed = registry
        .parse(["--files", "1", "2", "3", "4", "5", "6", "7"])
        .unwrap();
    assert_eq!(consumed, 6);
    assert_eq!(
        registry.items::<String>("--files").unwrap(),
        ["1", "2", "3", "4", "5"]
    );
}

#[test]
fn switch_is_specified_only_when_present() {
    let mut registry = Registry::builder()
        .option(switch("--force").alias("-f"))
        .option(switch("--dry-run"))
        .build()
        .unwrap();
    assert_eq!(registry.parse(["-f", "--force", "-f"]).unwrap(), 3);
    assert_eq!(registry.switch_state("--force").unwrap(), SwitchState::Specified);
    assert_eq!(registry.switch_state("--dry-run").unwrap(), SwitchState::Omitted);
}

#[test]
fn aliased_variables_receive_parsed_values() {
    let mut port = 80u16;
    let mut hosts: Vec<Ipv4Addr> = Vec::new();
    let mut verbose = SwitchState::Omitted;

    {
        let mut registry = Registry::builder()
            .option(scalar_ref("--port", &mut port))
            .option(vector_ref("--hosts", &mut hosts).quantifier(0, 4))
            .option(switch_ref("--verbose", &mut verbose))
            .build()
            .unwrap();
        registry
            .parse(["--hosts", "10.0.0.1", "10.0.0.2", "--port", "8080", "--verbose"])
            .unwrap();
        assert_eq!(*registry.value::<u16>("--port").unwrap(), 8080);
    }

    assert_eq!(port, 8080);
    assert_eq!(hosts, [Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]);
    assert!(verbose.is_specified());
}

#[test]
fn empty_aliased_vector_below_minimum_fails_at_build() {
    let mut hosts: Vec<Ipv4Addr> = Vec::new();
    let err = Registry::builder()
        .option(vector_ref("--hosts", &mut hosts).quantifier(1, 4))
        .build()
        .unwrap_err();
    match err {
        Error::InsufficientVectorItems { key, got, min } => {
            assert_eq!(key, "--hosts");
            assert_eq!(got, 0);
            assert_eq!(min, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_owned_default_enforces_minimum_on_parse() {
    let mut registry = Registry::builder()
        .option(vector::<Ipv4Addr>("--hosts", Vec::new()).quantifier(1, 4))
        .option(switch("--verbose"))
        .build()
        .unwrap();
    assert!(registry.items::<Ipv4Addr>("--hosts").unwrap().is_empty());

    let err = registry.parse(["--hosts", "--verbose"]).unwrap_err();
    assert_eq!(
        err,
        Error::InsufficientVectorItems {
            key: "--hosts".to_string(),
            got: 0,
            min: 1,
        }
    );

    registry.parse(["--hosts", "10.0.0.1"]).unwrap();
    assert_eq!(
        registry.items::<Ipv4Addr>("--hosts").unwrap(),
        [Ipv4Addr::new(10, 0, 0, 1)]
    );
}

#[test]
fn key_like_strings_survive_round_trip() {
    let declare = |tags: Vec<String>| {
        Registry::builder()
            .option(vector("--tags", tags))
            .option(scalar("--count", 0i32))
            .build()
            .unwrap()
    };

    let source = declare(vec!["a".to_string(), "--count".to_string(), "-x".to_string()]);
    let text = source.output().unwrap();
    assert_eq!(text, r#"--tags a "--count" "-x" --count 0"#);

    let mut target = declare(Vec::new());
    target.input(&text).unwrap();
    assert_eq!(target.items::<String>("--tags").unwrap(), ["a", "--count", "-x"]);
    assert_eq!(*target.value::<i32>("--count").unwrap(), 0);
}

#[test]
fn aliased_vector_is_untouched_on_failure() {
    let mut hosts = vec![Ipv4Addr::LOCALHOST];
    {
        let mut registry = Registry::builder()
            .option(vector_ref("--hosts", &mut hosts))
            .build()
            .unwrap();
        let err = registry.parse(["--hosts", "10.0.0.1", "nope"]).unwrap_err();
        assert!(matches!(err, Error::ValueDecode { ref key, .. } if key == "--hosts"));
    }
    assert_eq!(hosts, [Ipv4Addr::LOCALHOST]);
}

#[test]
fn output_then_input_reproduces_values() {
    let mut source = Registry::builder()
        .option(scalar("--name", String::new()))
        .option(scalar("--ratio", 0.0f64))
        .option(vector::<String>("--tags", Vec::new()))
        .option(vector::<NamedInt>("--named", Vec::new()))
        .option(switch("--force"))
        .build()
        .unwrap();
    source
        .parse([
            "--name", "two words", "--ratio", "0.25", "--tags", "a", "", "--named", "One", "1",
            "Two", "2", "--force",
        ])
        .unwrap();
    let text = source.output().unwrap();
    assert_eq!(
        text,
        r#"--name "two words" --ratio 0.25 --tags a "" --named One 1 Two 2 --force"#
    );

    let mut target = Registry::builder()
        .option(scalar("--name", String::new()))
        .option(scalar("--ratio", 0.0f64))
        .option(vector::<String>("--tags", Vec::new()))
        .option(vector::<NamedInt>("--named", Vec::new()))
        .option(switch("--force"))
        .build()
        .unwrap();
    target.input(&text).unwrap();

    assert_eq!(target.value::<String>("--name").unwrap(), "two words");
    assert_eq!(*target.value::<f64>("--ratio").unwrap(), 0.25);
    assert_eq!(target.items::<String>("--tags").unwrap(), ["a", ""]);
    assert_eq!(
        target.items::<NamedInt>("--named").unwrap(),
        [named("One", 1), named("Two", 2)]
    );
    assert!(target.switch_state("--force").unwrap().is_specified());
    assert_eq!(target.output().unwrap(), text);
}

#[test]
fn wide_items_are_taken_whole() {
    let mut registry = Registry::builder()
        .option(vector::<NamedInt>("--named", Vec::new()))
        .option(scalar("--count", 0i32))
        .build()
        .unwrap();
    let consumed = registry
        .parse(["--named", "One", "1", "Two", "2", "--count", "3"])
        .unwrap();
    assert_eq!(consumed, 7);
    assert_eq!(registry.items::<NamedInt>("--named").unwrap().len(), 2);

    let err = registry
        .parse(["--named", "One", "1", "Two", "--count", "3"])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::IncompleteVectorItem { expected: 2, found: 1, .. }
    ));
}

struct Hex;

impl ValueCodec<u32> for Hex {
    fn decode(&self, tokens: &[String]) -> Result<u32, String> {
        let token = argdecl::codec::single_token(tokens)?;
        let digits = token.strip_prefix("0x").unwrap_or(token);
        u32::from_str_radix(digits, 16).map_err(|e| e.to_string())
    }

    fn encode(&self, value: &u32, out: &mut String) -> Result<(), String> {
        out.push_str(&format!("{value:#x}"));
        Ok(())
    }
}

#[test]
fn custom_codecs_and_overrides() {
    let mut registry = Registry::builder()
        .option(scalar("--mask", 0u32).codec(Hex))
        .option(ScalarDef::owned_with("--id", 0u32, Hex).encoder(|v: &u32, out: &mut String| {
            out.push_str(&v.to_string());
            Ok(())
        }))
        .build()
        .unwrap();
    registry.parse(["--mask", "0xff", "--id", "10"]).unwrap();
    assert_eq!(*registry.value::<u32>("--mask").unwrap(), 255);
    assert_eq!(*registry.value::<u32>("--id").unwrap(), 16);
    assert_eq!(registry.output().unwrap(), "--mask 0xff --id 16");
}

#[test]
fn strict_policy_stops_at_unknown_key() {
    let mut registry = Registry::new(
        [scalar("--count", 0i32)],
        ParsingPolicy::RejectUndeclared,
    )
    .unwrap();
    let err = registry.parse(["--count", "1", "--unknown"]).unwrap_err();
    assert_eq!(err.key(), Some("--unknown"));
    // Options parsed before the failure keep their values.
    assert_eq!(*registry.value::<i32>("--count").unwrap(), 1);

    let mut lenient = Registry::new([scalar("--count", 0i32)], ParsingPolicy::default()).unwrap();
    assert_eq!(lenient.parse(["--unknown", "--count", "2"]).unwrap(), 2);
}

#[test]
fn typed_access_reports_mismatch() {
    let mut registry = Registry::builder()
        .option(scalar("--count", 0i32))
        .build()
        .unwrap();
    assert!(matches!(
        registry.value::<String>("--count").unwrap_err(),
        Error::ValueTypeMismatch { .. }
    ));
    *registry.get_mut("--count").unwrap().value_mut::<i32>().unwrap() = 4;
    assert_eq!(registry.output().unwrap(), "--count 4");
}
