use crate::domain::models::JsonOut;
use crate::error::Error;
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(json: bool, data: T, row: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Failure envelope mirroring the success shape; the code is stable for
/// engine errors and `INTERNAL` for everything else.
pub fn print_failure(json: bool, err: &anyhow::Error) {
    let code = err
        .downcast_ref::<Error>()
        .map(Error::code)
        .unwrap_or("INTERNAL");
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": { "code": code, "message": format!("{:#}", err) }
            })
        );
    } else {
        eprintln!("error: {:#}", err);
    }
}
