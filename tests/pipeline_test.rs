use approx::assert_abs_diff_eq;

use sensorfilt::config::SensorConfig;
use sensorfilt::data_io::read_rows;
use sensorfilt::pipeline::{ACCELERATIONS_FILE, AccelPipeline, POSITIONS_FILE, VELOCITIES_FILE};
use sensorfilt::simulation::generate_accel_recording;

#[test]
fn test_rest_calibration_measures_sensor_noise() {
    let sigma = 0.05;
    let recording = generate_accel_recording(800, 400, 0.01, 9.78, sigma, 12);

    let mut config = SensorConfig::default();
    config.kalman.q = 0.01;
    config.pipeline.seed = Some(1);
    let mut pipeline = AccelPipeline::new(&config).unwrap();

    for (i, &sample) in recording.iter().enumerate() {
        pipeline.process(sample);
        assert_eq!(pipeline.is_calibrated(), i + 1 >= 800);
    }

    for params in pipeline.filter_parameters() {
        assert_abs_diff_eq!(params.r, sigma * sigma, epsilon = 5e-4);
        assert_eq!(params.q, 0.01);
    }
    assert_eq!(pipeline.accelerations().len(), 1200 * 3);
}

#[test]
fn test_recordings_written_as_xyz_rows() {
    let recording = generate_accel_recording(10, 20, 0.01, 9.78, 0.01, 3);
    let mut config = SensorConfig::default();
    config.pipeline.rest_samples = 10;
    config.pipeline.seed = Some(2);
    let mut pipeline = AccelPipeline::new(&config).unwrap();
    for sample in recording {
        pipeline.process(sample);
    }

    let dir = std::env::temp_dir().join("sensorfilt_pipeline_test");
    pipeline.write_recordings(&dir).unwrap();
    for name in [ACCELERATIONS_FILE, VELOCITIES_FILE, POSITIONS_FILE] {
        let rows = read_rows(dir.join(name)).unwrap();
        assert_eq!(rows.len(), 30, "{}", name);
        assert!(rows.iter().all(|r| r.len() == 3));
    }
    let _ = std::fs::remove_dir_all(&dir);
}
