pub mod completions;
pub mod config;
pub mod focus;
pub mod insights;
pub mod stats;
pub mod task;

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
