use schema::Options;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=data/presets.ron");
    println!("cargo:rerun-if-changed=data/buffs.ron");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("generated_data.rs");
    let mut file = BufWriter::new(fs::File::create(&dest_path).expect("create generated_data.rs"));

    let presets = load_presets("data/presets.ron");
    let buffs = load_buffs("data/buffs.ron");

    // Presets are stored as postcard bytes keyed by name.
    let mut map = phf_codegen::Map::new();
    for (name, options) in &presets {
        if let Err(e) = options.validate() {
            panic!("Preset '{}' is invalid: {}", name, e);
        }
        let bytes = postcard::to_allocvec(options).expect("serialize preset");
        map.entry(name.as_str(), &format!("&{:?}", bytes));
    }
    writeln!(
        file,
        "static COMPILED_PRESETS: phf::Map<&'static str, &'static [u8]> = {};",
        map.build()
    )
    .expect("write presets");

    let names: Vec<String> = presets.keys().map(|name| format!("{:?}", name)).collect();
    writeln!(
        file,
        "static PRESET_NAMES: &[&str] = &[{}];",
        names.join(", ")
    )
    .expect("write preset names");

    let buffs: Vec<String> = buffs.iter().map(|buff| format!("{:?}", buff)).collect();
    writeln!(file, "pub static BUFFS: &[&str] = &[{}];", buffs.join(", ")).expect("write buffs");
}

fn load_presets(path: &str) -> BTreeMap<String, Options> {
    let content = fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {}", path, e));
    ron::from_str(&content).unwrap_or_else(|e| panic!("parse {}: {}", path, e))
}

fn load_buffs(path: &str) -> Vec<String> {
    let content = fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {}", path, e));
    let buffs: Vec<String> =
        ron::from_str(&content).unwrap_or_else(|e| panic!("parse {}: {}", path, e));
    if buffs.is_empty() {
        panic!("{} must list at least one buff", path);
    }
    buffs
}
