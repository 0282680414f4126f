use crate::cli::StateArgs;
use crate::config::Config;
use crate::state::StateStore;

pub fn execute(args: StateArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;
    let store = StateStore::new(&config.state_file);

    let value = match args.key {
        Some(key) => match store.get(&key) {
            Some(value) => value,
            None => anyhow::bail!(
                "No state stored under '{}' in {}",
                key,
                store.path().display()
            ),
        },
        None => serde_json::Value::Object(store.load()),
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
