use std::io::Write;

pub const OPS_HEADER: &str =
    "op, request, vendor, requester, service, code, name, email, phone, scheduled, description, address";

/// Writes the rows that take one Plumbing request into progress: vendor 1
/// registered and approved, request 1 created, assigned and started.
pub fn write_in_progress_prelude(file: &mut impl Write) {
    writeln!(file, "{OPS_HEADER}").unwrap();
    writeln!(
        file,
        "register-vendor, , , , Plumbing, , Ramesh Plumber, ramesh@example.com, +91-9876543214, , , Sector 15 Noida"
    )
    .unwrap();
    writeln!(file, "approve, , 1").unwrap();
    writeln!(
        file,
        "create, , , 42, Plumbing, , , , , , Leaking kitchen tap, Sector 15 Noida"
    )
    .unwrap();
    writeln!(file, "assign, 1, 1").unwrap();
    writeln!(file, "start, 1").unwrap();
}

/// Pulls one column of one request's row out of a requests report.
pub fn report_field(stdout: &str, request_id: u64, column: &str) -> Option<String> {
    let mut reader = csv::ReaderBuilder::new().from_reader(stdout.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let idx = headers.iter().position(|h| h == column)?;

    let wanted = request_id.to_string();
    for record in reader.records() {
        let record = record.unwrap();
        if record.get(0) == Some(wanted.as_str()) {
            return record.get(idx).map(str::to_string);
        }
    }
    None
}
