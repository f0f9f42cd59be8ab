//! Usage: `mirror_clip <asset root> <package path> <mirror table.json> [settings.json]`
//!
//! Loads `<asset root>/<package path>.anim.json`, mirrors it and writes the
//! result next to it. Set `RUST_LOG=info` to see what was written.

use anyhow::{Context, bail};

use anim_mirror::{AssetPath, AssetStore, FileAssetStore, MirrorAnimationModule, MirrorSettings, MirrorTable};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        bail!("usage: mirror_clip <asset root> <package path> <mirror table.json> [settings.json]");
    }

    let settings = match args.get(3) {
        Some(path) => MirrorSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {path}"))?,
        None => MirrorSettings::default(),
    };

    let mut store = FileAssetStore::from_settings(&args[0], &settings);
    let source_path = AssetPath::from_package(args[1].as_str())?;
    let source = store
        .load_clip(&source_path)
        .with_context(|| format!("Failed to load {source_path}"))?;
    let table = MirrorTable::from_json_file(&args[2])
        .with_context(|| format!("Failed to load mirror table {}", args[2]))?;

    let mut module = MirrorAnimationModule::new(settings);
    module.startup_module();
    let result = module.make_mirror_animation(Some(&source), Some(&table), &mut store);
    module.shutdown_module();

    let output = result?;
    println!("{} -> {}", output.clip.path(), output.location);
    Ok(())
}
