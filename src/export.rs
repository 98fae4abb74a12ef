//! CSV export of sweep results

use std::path::Path;

use crate::error::{Result, SimError};
use crate::grid::TimeGrid;
use crate::trajectory::Trajectory;

/// Save a sweep to CSV with a time column and an `x`/`p` column pair per mu
///
/// # CSV Format
///
/// ```csv
/// time,x (mu = 0),p (mu = 0),x (mu = 1),p (mu = 1)
/// 0,0,1,0,1
/// 0.01,0.0099998,0.99995,0.0100498,1.0000497
/// ```
///
/// # Errors
///
/// Returns `OutputWriteFailure` if the file cannot be created or written,
/// and `InvalidArgument` if a trajectory does not match the grid length.
pub fn save_csv(path: impl AsRef<Path>, grid: &TimeGrid, trajectories: &[Trajectory]) -> Result<()> {
    let path = path.as_ref();

    if let Some(bad) = trajectories.iter().find(|t| t.len() != grid.len()) {
        return Err(SimError::invalid(format!(
            "trajectory for {} has {} samples, grid has {}",
            bad.label(),
            bad.len(),
            grid.len()
        )));
    }

    let write_err = |e: csv::Error| SimError::write_failure(path, e);
    let mut wtr = csv::Writer::from_path(path).map_err(write_err)?;

    let mut header = vec!["time".to_string()];
    for traj in trajectories {
        header.push(format!("x ({})", traj.label()));
        header.push(format!("p ({})", traj.label()));
    }
    wtr.write_record(&header).map_err(write_err)?;

    for (i, t) in grid.iter().enumerate() {
        let mut record = Vec::with_capacity(1 + 2 * trajectories.len());
        record.push(t.to_string());
        for traj in trajectories {
            let state = traj.states()[i];
            record.push(state.position.to_string());
            record.push(state.momentum.to_string());
        }
        wtr.write_record(&record).map_err(write_err)?;
    }

    wtr.flush()
        .map_err(|e| SimError::write_failure(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhaseState;

    #[test]
    fn test_save_sweep() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.csv");
        let grid = TimeGrid::from_points(vec![0.0, 0.5]).unwrap();
        let trajs = [
            Trajectory::new(0.0, vec![PhaseState::new(0.0, 1.0), PhaseState::new(0.5, 0.75)]),
            Trajectory::new(2.0, vec![PhaseState::new(0.0, 1.0), PhaseState::new(0.25, 1.5)]),
        ];

        save_csv(&path, &grid, &trajs).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "time,x (mu = 0),p (mu = 0),x (mu = 2),p (mu = 2)");
        assert_eq!(lines[1], "0,0,1,0,1");
        assert_eq!(lines[2], "0.5,0.5,0.75,0.25,1.5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_save_empty_sweep_writes_time_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let grid = TimeGrid::from_points(vec![0.0, 1.0]).unwrap();

        save_csv(&path, &grid, &[]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "time\n0\n1\n");
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let grid = TimeGrid::from_points(vec![0.0, 1.0]).unwrap();
        let trajs = [Trajectory::new(1.0, vec![PhaseState::new(0.0, 1.0)])];

        let err = save_csv(dir.path().join("bad.csv"), &grid, &trajs).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.csv");
        let grid = TimeGrid::from_points(vec![0.0]).unwrap();

        let err = save_csv(&path, &grid, &[]).unwrap_err();
        assert!(matches!(err, SimError::OutputWriteFailure { .. }));
    }
}
