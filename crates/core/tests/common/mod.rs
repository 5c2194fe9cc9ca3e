#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Smallest parseable class file: a public class with the given internal
/// name extending java/lang/Object, no members.
pub fn minimal_class_bytes(internal_name: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xCAFE_BABE_u32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes()); // minor version
    bytes.extend_from_slice(&52u16.to_be_bytes()); // major version (Java 8)
    bytes.extend_from_slice(&5u16.to_be_bytes()); // constant pool count
    // #1: Utf8 <internal_name>
    bytes.push(1);
    bytes.extend_from_slice(&(internal_name.len() as u16).to_be_bytes());
    bytes.extend_from_slice(internal_name.as_bytes());
    // #2: Class #1
    bytes.push(7);
    bytes.extend_from_slice(&1u16.to_be_bytes());
    // #3: Utf8 java/lang/Object
    let object = b"java/lang/Object";
    bytes.push(1);
    bytes.extend_from_slice(&(object.len() as u16).to_be_bytes());
    bytes.extend_from_slice(object);
    // #4: Class #3
    bytes.push(7);
    bytes.extend_from_slice(&3u16.to_be_bytes());
    bytes.extend_from_slice(&0x0021u16.to_be_bytes()); // ACC_PUBLIC | ACC_SUPER
    bytes.extend_from_slice(&2u16.to_be_bytes()); // this_class
    bytes.extend_from_slice(&4u16.to_be_bytes()); // super_class
    bytes.extend_from_slice(&0u16.to_be_bytes()); // interfaces
    bytes.extend_from_slice(&0u16.to_be_bytes()); // fields
    bytes.extend_from_slice(&0u16.to_be_bytes()); // methods
    bytes.extend_from_slice(&0u16.to_be_bytes()); // attributes
    bytes
}

/// Write a minimal class file under `root`, creating package directories
/// as needed. `internal_name` is slash-separated, e.g. `p/X`.
pub fn write_class(root: &Path, internal_name: &str) {
    let path = root.join(format!("{internal_name}.class"));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, minimal_class_bytes(internal_name)).unwrap();
}

/// Write a jar containing a minimal class file per internal name.
pub fn write_jar(path: &Path, internal_names: &[&str]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for name in internal_names {
        zip.start_file(format!("{name}.class"), options).unwrap();
        zip.write_all(&minimal_class_bytes(name)).unwrap();
    }
    zip.finish().unwrap();
}
