use std::io::{self, Write};
use std::path::Path;

use crate::dynamics::state::BodySnapshot;

/// Write trajectory data to CSV format.
///
/// Columns: tick, time, position, velocity, acceleration, error, target,
///          saturated, at_goal
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[BodySnapshot]) -> io::Result<()> {
    writeln!(
        writer,
        "tick,time,position,velocity,acceleration,error,target,saturated,at_goal"
    )?;

    for s in trajectory {
        writeln!(
            writer,
            "{},{:.4},{:.6},{:.6},{:.6},{:.6},{:.6},{},{}",
            s.tick,
            s.time,
            s.position,
            s.velocity,
            s.acceleration,
            s.error,
            s.target,
            u8::from(s.saturated),
            u8::from(s.at_goal),
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &[BodySnapshot]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, trajectory)?;
    file.flush()
}
