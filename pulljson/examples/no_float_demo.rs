// SPDX-License-Identifier: Apache-2.0

// Example of number handling with and without the "float" feature.
//
// cargo run --example no_float_demo                          # Full float support
// cargo run --example no_float_demo --no-default-features    # Integers and raw number text only

use pulljson::{decode, ParseError, ValueType};

fn main() -> Result<(), ParseError> {
    let json = r#"{"integers": [1, -2, 3], "floats": [1.5, 2.7, 3.14], "scientific": [1e3, 2.5e-1, 1.23e+2]}"#;

    #[cfg(feature = "float")]
    println!("Configuration: Float support enabled");
    #[cfg(not(feature = "float"))]
    println!("Configuration: Float support disabled (raw number text for non-integers)");

    decode(json, |d| {
        d.open_object()?;
        while d.has_more() {
            let key = d.read_str()?;
            print!("{key}:");
            d.open_array()?;
            while d.has_more() {
                if d.peek() != Some(ValueType::Number) {
                    d.skip_value()?;
                    continue;
                }
                if key == "integers" {
                    print!(" {}", d.read_i64()?);
                } else {
                    print_number(d)?;
                }
            }
            d.close_array()?;
            println!();
        }
        d.close_object()
    })
}

#[cfg(feature = "float")]
fn print_number(d: &mut pulljson::Decoder<'_>) -> Result<(), ParseError> {
    print!(" {}", d.read_f64()?);
    Ok(())
}

#[cfg(not(feature = "float"))]
fn print_number(d: &mut pulljson::Decoder<'_>) -> Result<(), ParseError> {
    print!(" \"{}\"", d.read_number_str()?);
    Ok(())
}
