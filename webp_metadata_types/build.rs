//! Generates the tag tables in `src/tags.rs` from `tags.yaml`.
//!
//! Each top-level key in the YAML file becomes a module of `u32` constants,
//! plus a `NAMES` table (sorted by identifier) for display purposes.

use std::{env, fmt::Write as _, fs, path::PathBuf};

use yaml_rust2::{Yaml, YamlLoader};

const TAG_TABLE: &str = "tags.yaml";

fn main() {
    println!("cargo::rerun-if-changed={TAG_TABLE}");
    println!("cargo::rerun-if-changed=build.rs");

    let raw = fs::read_to_string(TAG_TABLE)
        .unwrap_or_else(|e| panic!("failed to read `{TAG_TABLE}`. err: {e}"));
    let docs = YamlLoader::load_from_str(&raw)
        .unwrap_or_else(|e| panic!("`{TAG_TABLE}` isn't valid YAML. err: {e}"));
    let groups = docs
        .first()
        .and_then(Yaml::as_hash)
        .unwrap_or_else(|| panic!("`{TAG_TABLE}` should be a map of groups to tag lists"));

    let mut out = String::from("// @generated by `build.rs` from `tags.yaml`. do not edit!\n\n");

    for (group, tags) in groups {
        let group = group
            .as_str()
            .unwrap_or_else(|| panic!("group names must be strings. got: {group:?}"));
        let tags = tags
            .as_vec()
            .unwrap_or_else(|| panic!("group `{group}` must be a list of tags"));

        let mut parsed: Vec<(u32, &str, &str)> = tags
            .iter()
            .map(|tag| {
                let ident = tag["const"]
                    .as_str()
                    .unwrap_or_else(|| panic!("tag in `{group}` has no `const`. got: {tag:?}"));
                let name = tag["name"]
                    .as_str()
                    .unwrap_or_else(|| panic!("tag `{group}::{ident}` has no `name`"));
                (parse_id(group, ident, &tag["id"]), ident, name)
            })
            .collect();
        parsed.sort_by_key(|(id, _, _)| *id);

        if let Some(w) = parsed.windows(2).find(|w| w[0].0 == w[1].0) {
            panic!(
                "group `{group}` has a duplicate id `{:#x}` (`{}` and `{}`)",
                w[0].0, w[0].1, w[1].1
            );
        }

        writeln!(out, "/// Tags found in `{group}` directories.").unwrap();
        writeln!(out, "pub mod {group} {{").unwrap();
        for (id, ident, name) in &parsed {
            writeln!(out, "    /// {name}").unwrap();
            writeln!(out, "    pub const {ident}: u32 = {id:#06x};").unwrap();
        }
        writeln!(out, "\n    /// Display names, sorted by tag identifier.").unwrap();
        writeln!(out, "    pub const NAMES: &[(u32, &str)] = &[").unwrap();
        for (id, _, name) in &parsed {
            writeln!(out, "        ({id:#06x}, {name:?}),").unwrap();
        }
        writeln!(out, "    ];\n}}\n").unwrap();
    }

    let dest = PathBuf::from(env::var_os("OUT_DIR").expect("cargo always sets `OUT_DIR`"))
        .join("tags.rs");
    fs::write(&dest, out).unwrap_or_else(|e| panic!("failed to write `{dest:?}`. err: {e}"));
}

/// Reads a tag id, which is either a YAML integer or a (hex) string.
fn parse_id(group: &str, ident: &str, raw: &Yaml) -> u32 {
    let parsed = match raw {
        Yaml::Integer(i) => u32::try_from(*i).ok(),
        Yaml::String(s) => match s.strip_prefix("0x") {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        },
        _ => None,
    };

    parsed.unwrap_or_else(|| panic!("tag `{group}::{ident}` has a bad `id`. got: {raw:?}"))
}
