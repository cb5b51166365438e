use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// When the result carries an amortization schedule, the schedule rows are
/// what belongs in a spreadsheet, so they take the CSV slot. Everything else
/// becomes two-column field,value records with nested objects flattened to
/// dotted field names.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                if let Some(Value::Array(rows)) = result.get("schedule") {
                    if !rows.is_empty() {
                        write_array_csv(&mut wtr, rows);
                        let _ = wtr.flush();
                        return;
                    }
                }

                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    match val {
                        Value::Array(_) => {}
                        Value::Object(_) => write_nested(&mut wtr, key, val),
                        _ => {
                            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                        }
                    }
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_nested(wtr: &mut csv::Writer<io::StdoutLock<'_>>, prefix: &str, value: &Value) {
    if let Value::Object(map) = value {
        for (key, val) in map {
            let path = format!("{}.{}", prefix, key);
            match val {
                Value::Object(_) => write_nested(wtr, &path, val),
                Value::Array(_) => {}
                _ => {
                    let _ = wtr.write_record([path.as_str(), &format_csv_value(val)]);
                }
            }
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(*h)
                            .map(|v| format_csv_value(v))
                            .unwrap_or_default()
                    })
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
