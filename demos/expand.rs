use std::io;
use std::os::unix::ffi::OsStrExt;

use specifier::system::{SystemSpecifiers, standard_specifiers};
use specifier::{Literal, Specifier, escape, expand};

fn usage(mut out: impl io::Write, status: i32) -> ! {
    let _ = writeln!(
        out,
        "\
usage: expand [options...] text...
options:
  -e, --escape          print the escaped text instead of expanding it
  -i, --instance NAME   value for the %i specifier
"
    );

    std::process::exit(status);
}

fn main() -> io::Result<()> {
    let mut args = std::env::args_os().skip(1);

    let mut escape_only = false;
    let mut instance = None;
    let mut texts = Vec::new();

    while let Some(arg_os) = args.next() {
        let arg = arg_os.as_bytes();

        if arg == b"-h" || arg == b"--help" {
            usage(std::io::stdout(), 0);
        }

        if arg == b"-e" || arg == b"--escape" {
            escape_only = true;
            continue;
        }

        if arg == b"-i" || arg == b"--instance" {
            match args.next().map(|name| name.into_string()) {
                Some(Ok(name)) => instance = Some(name),
                _ => usage(std::io::stderr(), 1),
            }
            continue;
        }

        if arg == b"--" {
            texts.extend(args.by_ref());
            break;
        } else if arg.starts_with(b"-") {
            usage(std::io::stderr(), 1);
        } else {
            texts.push(arg_os);
        }
    }

    if texts.is_empty() {
        usage(std::io::stderr(), 1);
    }

    let instance = Literal(instance.as_deref().unwrap_or(""));
    let mut table = standard_specifiers::<()>(SystemSpecifiers::all());
    table.push(Specifier::new('i', &instance));

    for text in texts {
        let Some(text) = text.to_str() else {
            eprintln!("skipping non UTF-8 argument {text:?}");
            continue;
        };
        if escape_only {
            println!("{}", escape(text)?);
        } else {
            println!("{}", expand(text, &table, &())?);
        }
    }

    Ok(())
}
