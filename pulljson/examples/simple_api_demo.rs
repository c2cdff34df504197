// SPDX-License-Identifier: Apache-2.0

// Example walking a document of unknown shape with peek and the typed reads

use pulljson::{Decoder, ParseError, ValueType};

fn dump(decoder: &mut Decoder<'_>, indent: usize) -> Result<(), ParseError> {
    let pad = "  ".repeat(indent);
    match decoder.peek() {
        Some(ValueType::Object) => {
            println!("{pad}object {{");
            decoder.open_object()?;
            while decoder.has_more() {
                println!("{pad}  key '{}'", decoder.read_str()?);
                dump(decoder, indent + 2)?;
            }
            decoder.close_object()?;
            println!("{pad}}}");
        }
        Some(ValueType::Array) => {
            println!("{pad}array [");
            decoder.open_array()?;
            while decoder.has_more() {
                dump(decoder, indent + 1)?;
            }
            decoder.close_array()?;
            println!("{pad}]");
        }
        Some(ValueType::String) => println!("{pad}string '{}'", decoder.read_str()?),
        Some(ValueType::Number) => println!("{pad}number {}", decoder.read_number_str()?),
        Some(ValueType::Boolean) => println!("{pad}bool {}", decoder.read_bool()?),
        Some(ValueType::Null) => {
            decoder.read_null()?;
            println!("{pad}null");
        }
        None => decoder.skip_value()?,
    }
    Ok(())
}

fn main() -> Result<(), ParseError> {
    let json = r#"{"name": "value", "number": 42, "flag": true, "list": [1.5, null, "café"]}"#;
    println!("Input: {}", json);

    let mut decoder = Decoder::new();
    decoder.begin(json);
    dump(&mut decoder, 0)?;
    decoder.end()?;

    // The first error sticks until the next session
    decoder.begin(r#"[1, 2,, 3]"#);
    let result = dump(&mut decoder, 0);
    println!("Malformed input: {:?}", result);
    println!("Latched: {:?}", decoder.error());
    if let Err(err) = decoder.end() {
        println!("end(): {}", err);
    }
    Ok(())
}
