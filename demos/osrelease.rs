use std::io;

use specifier::system::OsRelease;

fn main() -> io::Result<()> {
    let os_release = match std::env::args_os().nth(1) {
        Some(root) => OsRelease::load_from_root(root)?,
        None => OsRelease::load()?,
    };
    for (key, value) in os_release.iter() {
        println!("{key}={value:?}");
    }
    Ok(())
}
