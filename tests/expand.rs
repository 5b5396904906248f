use std::io;
use std::sync::Mutex;
use std::thread;

use specifier::{Error, Literal, Resolve, Specifier, escape, escape_list, expand};

/// A resolver reading values from the userdata.
struct FromUnit;

struct Unit {
    name: &'static str,
    instance: Option<&'static str>,
}

impl Resolve<Unit> for FromUnit {
    fn resolve(&self, specifier: char, unit: &Unit) -> io::Result<String> {
        match specifier {
            'n' => Ok(unit.name.to_owned()),
            'i' => unit
                .instance
                .map(str::to_owned)
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not an instance")),
            _ => unreachable!("FromUnit bound to unexpected specifier {specifier:?}"),
        }
    }
}

const UNIT_TABLE: &[Specifier<'static, Unit>] = &[
    Specifier::new('n', &FromUnit),
    Specifier::new('i', &FromUnit),
    Specifier::new('P', &Literal("/usr/lib/systemd")),
    Specifier::reserved('j'),
];

#[test]
fn unit_table() -> anyhow::Result<()> {
    let unit = Unit {
        name: "getty@tty1.service",
        instance: Some("tty1"),
    };

    assert_eq!(
        expand("ExecStart=%P/agetty --noclear %i", UNIT_TABLE, &unit)?,
        "ExecStart=/usr/lib/systemd/agetty --noclear tty1"
    );
    assert_eq!(
        expand("Description=%n (%%i = %i)", UNIT_TABLE, &unit)?,
        "Description=getty@tty1.service (%i = tty1)"
    );
    assert_eq!(
        expand("date +%-d.%-m; printf %.3s", UNIT_TABLE, &unit)?,
        "date +%-d.%-m; printf %.3s"
    );

    Ok(())
}

#[test]
fn failures_return_no_output() {
    let unit = Unit {
        name: "plain.service",
        instance: None,
    };

    match expand("%n has instance %i", UNIT_TABLE, &unit) {
        Err(Error::ResolverFailed { specifier, source }) => {
            assert_eq!(specifier, 'i');
            assert_eq!(source.kind(), io::ErrorKind::InvalidInput);
        }
        other => panic!("expected a resolver failure, got {other:?}"),
    }

    assert!(matches!(
        expand("%n %j", UNIT_TABLE, &unit),
        Err(Error::BadSpecifier('j'))
    ));
    assert!(matches!(
        expand("%n %Z", UNIT_TABLE, &unit),
        Err(Error::BadSpecifier('Z'))
    ));
}

#[test]
fn aborts_at_first_failure() {
    let calls = Mutex::new(Vec::new());
    let record = |c: char, _: &()| -> io::Result<String> {
        calls.lock().unwrap().push(c);
        Ok(String::new())
    };
    let table: [Specifier<()>; 2] = [Specifier::new('a', &record), Specifier::new('b', &record)];

    assert!(matches!(
        expand("%a%b%X%a%b", &table, &()),
        Err(Error::BadSpecifier('X'))
    ));
    assert_eq!(*calls.lock().unwrap(), ['a', 'b']);
}

#[test]
fn concurrent_expansion() {
    let units = [
        Unit {
            name: "getty@tty1.service",
            instance: Some("tty1"),
        },
        Unit {
            name: "getty@tty2.service",
            instance: Some("tty2"),
        },
        Unit {
            name: "plain.service",
            instance: None,
        },
    ];

    let results: Vec<_> = thread::scope(|s| {
        let workers: Vec<_> = units
            .iter()
            .map(|unit| s.spawn(move || expand("%n on %i", UNIT_TABLE, unit)))
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("expansion thread panicked"))
            .collect()
    });

    assert_eq!(
        results[0].as_deref().ok(),
        Some("getty@tty1.service on tty1")
    );
    assert_eq!(
        results[1].as_deref().ok(),
        Some("getty@tty2.service on tty2")
    );
    assert!(matches!(
        results[2],
        Err(Error::ResolverFailed { specifier: 'i', .. })
    ));
}

#[test]
fn escaping_round_trip() -> anyhow::Result<()> {
    let unit = Unit {
        name: "x.service",
        instance: Some("y"),
    };
    let inputs = ["", "%", "%%", "%n", "100%", "a%-b", "%i@%n%", "%%%"];

    let escaped = escape_list(&inputs)?;
    assert_eq!(escaped.len(), inputs.len());
    for (input, escaped) in inputs.iter().zip(&escaped) {
        assert_eq!(*escaped, escape(input)?);
        assert_eq!(expand(escaped, UNIT_TABLE, &unit)?, *input);
        assert_eq!(expand(escaped, &[], &())?, *input);
    }

    Ok(())
}

#[test]
fn escape_lists() -> anyhow::Result<()> {
    let none: Vec<String> = Vec::new();
    assert!(escape_list(&none)?.is_empty());
    assert_eq!(escape_list(&["a%b", "c"])?, ["a%%b", "c"]);
    Ok(())
}

#[test]
fn errors_convert_to_io() {
    let err = expand("%q", &[], &()).unwrap_err();
    let err = io::Error::from(err);
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
}
