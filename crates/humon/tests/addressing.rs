use humon::{Error, Trove};

const SERVERS: &str = r#"{
    servers: [
        { name: alpha, port: 80 }
        { name: beta, port: 8080 }
    ]
    "odd key": 1
    "12": twelve
    "": empty
    "back\\slash": b
    "..": dots
    ^^a'b"c`d^^: all-quotes
    ^^a 'b" c`d^^: spaced-quotes
}"#;

fn load(text: &str) -> Trove {
    text.parse().unwrap()
}

fn value(trove: &Trove, address: &str) -> Option<String> {
    Some(trove.resolve(address).unwrap().value()?.to_owned())
}

fn illegal_reason(result: humon::Result<humon::NodeRef<'_>>) -> &'static str {
    match result {
        Err(Error::IllegalAddress { reason, .. }) => reason,
        other => panic!("expected an illegal address, got {other:?}"),
    }
}

#[test]
fn absolute_paths() {
    let trove = load(SERVERS);
    assert!(!trove.has_errors(), "{:?}", trove.errors());

    assert!(trove.resolve("/").unwrap().is_root());
    assert_eq!(value(&trove, "/servers/1/name").as_deref(), Some("beta"));
    assert_eq!(value(&trove, "/0/0/1").as_deref(), Some("80"));
    assert_eq!(value(&trove, "/servers/0/port").as_deref(), Some("80"));
    assert_eq!(value(&trove, " / servers / 1 / port ").as_deref(), Some("8080"));
}

#[test]
fn rendered_addresses() {
    let trove = load(SERVERS);
    let address = |path: &str| trove.resolve(path).unwrap().address();

    assert_eq!(trove.root().unwrap().address(), "/");
    assert_eq!(address("/servers/1/name"), "/servers/1/name");
    assert_eq!(address("/0/1/0"), "/servers/1/name");
    assert_eq!(address("/1"), "/'odd key'");
    assert_eq!(address("/2"), "/'12'");
    assert_eq!(address("/3"), "/''");
    assert_eq!(address("/4"), r"/'back\\slash'");
    assert_eq!(address("/5"), "/'..'");
    assert_eq!(address("/6"), "/a'b\"c`d");
    assert_eq!(address("/7"), "/^^a 'b\" c`d^^");
}

#[test]
fn quoted_segments() {
    let trove = load(SERVERS);

    assert_eq!(value(&trove, "/'odd key'").as_deref(), Some("1"));
    assert_eq!(value(&trove, "/\"odd key\"").as_deref(), Some("1"));
    assert_eq!(value(&trove, r"/odd\ key").as_deref(), Some("1"));
    assert_eq!(value(&trove, "/'12'").as_deref(), Some("twelve"));
    assert_eq!(value(&trove, "/''").as_deref(), Some("empty"));
    assert_eq!(value(&trove, r"/'back\\slash'").as_deref(), Some("b"));
    assert_eq!(value(&trove, "/'..'").as_deref(), Some("dots"));
    assert_eq!(value(&trove, "/^^a'b\"c`d^^").as_deref(), Some("all-quotes"));
    assert_eq!(value(&trove, "/^x^a'b\"c`d^x^").as_deref(), Some("all-quotes"));
    assert_eq!(value(&trove, "/a'b\"c`d").as_deref(), Some("all-quotes"));
    assert_eq!(value(&trove, "/^^a 'b\" c`d^^").as_deref(), Some("spaced-quotes"));
}

#[test]
fn ordinals_are_not_keys() {
    let trove = load(SERVERS);

    assert!(matches!(trove.resolve("/12"), Err(Error::NotFound { .. })));
    assert_eq!(value(&trove, "/2").as_deref(), Some("twelve"));
}

#[test]
fn relative_paths() {
    let trove = load(SERVERS);
    let root = trove.root().unwrap();
    let servers = trove.resolve("/servers").unwrap();

    assert_eq!(servers.resolve("0/name").unwrap().value(), Some("alpha"));
    assert_eq!(servers.resolve("..").unwrap(), root);
    assert_eq!(servers.resolve("1/../0/name").unwrap().value(), Some("alpha"));
    assert_eq!(servers.resolve("../'odd key'").unwrap().value(), Some("1"));
    assert_eq!(servers.resolve("").unwrap(), servers);
    assert_eq!(servers.resolve("/servers").unwrap(), servers);
    assert_eq!(servers.get("2"), None);
}

#[test]
fn not_found() {
    let trove = load(SERVERS);

    match trove.resolve("/servers/9") {
        Err(Error::NotFound { address }) => assert_eq!(address, "/servers/9"),
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(matches!(trove.resolve("/nope"), Err(Error::NotFound { .. })));
    assert!(matches!(trove.resolve("/servers/0/name/deeper"), Err(Error::NotFound { .. })));
    assert_eq!(trove.get("/nope"), None);

    let empty = load("// no value");
    assert!(matches!(empty.resolve("/"), Err(Error::NotFound { .. })));
}

#[test]
fn illegal_addresses() {
    let trove = load(SERVERS);
    let root = trove.root().unwrap();

    assert_eq!(illegal_reason(trove.resolve("servers")), "address must start with `/`");
    assert_eq!(illegal_reason(trove.resolve("/servers//0")), "empty segment");
    assert_eq!(illegal_reason(trove.resolve("/'odd key")), "unfinished quote");
    assert_eq!(illegal_reason(trove.resolve("/^^odd")), "unfinished quote");
    assert_eq!(illegal_reason(trove.resolve("/servers key")), "unexpected text after segment");
    assert_eq!(illegal_reason(trove.resolve("/servers/:")), "unexpected character in address");
    assert_eq!(illegal_reason(root.resolve("..")), "address goes above the root");
    assert_eq!(illegal_reason(root.resolve("servers/../..")), "address goes above the root");
}

#[test]
fn shared_keys_render_by_ordinal() {
    let trove = load("{ k: 1, k: 2, other: 3, k: 4 }");

    let addresses: Vec<_> = trove.root().unwrap().children().map(|child| child.address()).collect();
    assert_eq!(addresses, ["/k", "/1", "/other", "/3"]);

    let last = trove.resolve("/3").unwrap();
    assert_eq!(last.shared_key_index(), 2);
    assert_eq!(trove.resolve(&last.address()).unwrap(), last);
}

#[test]
fn every_address_resolves_to_its_node() {
    let trove = load(SERVERS);

    for node in trove.nodes() {
        assert_eq!(trove.resolve(&node.address()).unwrap(), node, "{}", node.address());
    }
}
