use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn generate_requests_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["amount", "recipient", "network"])?;

    for i in 1..=rows {
        let recipient = format!("0x{:040x}", i);
        wtr.write_record(["1.0", &recipient, "testnet"])?;
    }

    wtr.flush()?;
    Ok(())
}
