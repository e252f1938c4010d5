use lrukit::registry::Registry;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn report<T: std::fmt::Debug>(
    registry: &Registry,
    label: &str,
    result: Result<T, lrukit::RegistryError>,
) {
    match result {
        Ok(value) => println!("{label}: ok {value:?}"),
        Err(_) => println!("{label}: {}", registry.error_string()),
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lrukit=debug")),
        )
        .init();

    let mut registry = Registry::new();
    info!("starting registry session");

    let r = registry.create::<String, i32>("mycontainer", 3);
    report(&registry, "create mycontainer", r);
    for (key, value) in [
        ("mykey1", "42"),
        ("mykey2", "12"),
        ("mykey3", "65"),
        ("mykey4", "128"),
    ] {
        let r = registry.add("mycontainer", &format!("\"{key}\""), value);
        report(&registry, &format!("add {key}"), r);
    }
    let r = registry.get("mycontainer", "\"mykey1\"");
    report(&registry, "get mykey1", r);
    let r = registry.get("mycontainer", "\"mykey4\"");
    report(&registry, "get mykey4", r);

    let r = registry.create_by_type_names("container2", "float", "string", 2);
    report(&registry, "create container2", r);
    let r = registry.add("container2", "4.2", "\"val1\"");
    report(&registry, "add 4.2", r);
    let r = registry.get("container2", "4.2");
    report(&registry, "get 4.2", r);

    let r = registry.destroy("mycontainer");
    report(&registry, "destroy mycontainer", r);
    let r = registry.add("mycontainer", "\"mykey1\"", "1");
    report(&registry, "add after destroy", r);
}

// Expected output (log lines omitted):
// create mycontainer: ok ()
// add mykey1: ok ()
// add mykey2: ok ()
// add mykey3: ok ()
// add mykey4: ok ()
// get mykey1: Cache error: Entry not found
// get mykey4: ok "128"
// create container2: ok ()
// add 4.2: ok ()
// get 4.2: ok "\"val1\""
// destroy mycontainer: ok ()
// add after destroy: Cache not found
