use biosignal_windows::utils::{finite_range, is_degenerate, normalize_ecg, normalize_resp};
use biosignal_windows::{
    sliding_window, Partition, PatientData, PatientRecording, PatientSplit, SignalsError,
    WindowBuilder, WindowParams,
};

// 递增斜坡信号
fn ramp(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64).collect()
}

// 带呼吸节律的测试信号
fn wave(len: usize, period: f64) -> Vec<f64> {
    (0..len)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / period).sin())
        .collect()
}

fn dataset(entries: Vec<(u32, Vec<f64>, Vec<f64>)>) -> PatientData {
    entries
        .into_iter()
        .map(|(id, ecg, resp)| (id, PatientRecording::new(ecg, resp)))
        .collect()
}

#[test]
fn test_ramp_scenario() {
    let data = dataset(vec![
        (1, ramp(1000), ramp(1000)),
        (2, ramp(1000), ramp(1000)),
        (3, ramp(1000), ramp(1000)),
    ]);

    let (train_ecg, train_resp, val_ecg, val_resp, test_ecg, test_resp) =
        sliding_window(&data, 200, 64, 1.0, &[1], &[2], &[3]).unwrap();

    for array in [&train_ecg, &train_resp, &val_ecg, &val_resp, &test_ecg, &test_resp] {
        assert_eq!(array.shape(), &[5, 64, 1]);
    }

    // 第一个窗口在重采样前的归一化结果
    let builder = WindowBuilder::new(WindowParams::new(200, 64, 1.0).unwrap());
    let (ecg, resp) = builder.patient_windows(&data[&1]).next().unwrap();
    assert_eq!(ecg.len(), 200);
    assert_eq!(finite_range(&normalize_ecg(ecg).unwrap()), Some((-0.5, 0.5)));
    assert_eq!(finite_range(&normalize_resp(resp).unwrap()), Some((0.0, 1.0)));
}

#[test]
fn test_window_rows_are_paired() {
    let data = dataset(vec![
        (10, wave(3000, 125.0), wave(3000, 500.0)),
        (11, wave(2500, 90.0), wave(2600, 400.0)),
        (12, wave(1800, 110.0), wave(1800, 450.0)),
        (13, wave(2200, 100.0), wave(2200, 520.0)),
    ]);
    let split = PatientSplit::new(vec![10, 11], vec![12], vec![13]).unwrap();
    let builder = WindowBuilder::new(WindowParams::new(250, 50, 0.5).unwrap());
    let result = builder.build(&data, &split).unwrap();

    for partition in Partition::ALL {
        let windows = result.partition(partition);
        assert_eq!(windows.ecg.shape()[0], windows.resp.shape()[0]);
        assert_eq!(windows.ecg.shape()[1], 50);
        assert_eq!(windows.ecg.shape()[2], 1);
        assert!(!windows.is_empty());
    }

    // 患者 11 的呼吸信号更长，按较短的 ECG 截断
    let expected: usize = [10u32, 11]
        .iter()
        .map(|id| builder.surviving_windows(&data[id]))
        .sum();
    assert_eq!(result.train.len(), expected);
}

#[test]
fn test_count_with_flat_region() {
    // 1000 个样本，第 2、3 个窗口（200..600）为常数
    let mut ecg = wave(1000, 37.0);
    for v in ecg[200..600].iter_mut() {
        *v = 0.25;
    }
    let resp = wave(1000, 310.0);

    let data = dataset(vec![
        (1, ecg, resp),
        (2, wave(1000, 40.0), wave(1000, 300.0)),
        (3, wave(1000, 40.0), wave(1000, 300.0)),
    ]);

    let params = WindowParams::new(200, 32, 1.0).unwrap();
    assert_eq!(params.max_steps(1000), 5);

    let (train_ecg, train_resp, ..) = sliding_window(&data, 200, 32, 1.0, &[1], &[2], &[3]).unwrap();
    assert_eq!(train_ecg.shape(), &[3, 32, 1]);
    assert_eq!(train_resp.shape(), &[3, 32, 1]);
}

#[test]
fn test_flat_resp_discards_pair() {
    let mut resp = wave(800, 200.0);
    for v in resp[0..200].iter_mut() {
        *v = 1.0;
    }
    let data = dataset(vec![
        (1, wave(800, 50.0), resp),
        (2, wave(800, 50.0), wave(800, 200.0)),
        (3, wave(800, 50.0), wave(800, 200.0)),
    ]);

    let result = WindowBuilder::new(WindowParams::new(200, 16, 1.0).unwrap())
        .build(&data, &PatientSplit::new(vec![1], vec![2], vec![3]).unwrap())
        .unwrap();

    assert_eq!(result.train.len(), 3);
    assert_eq!(result.validation.len(), 4);
}

#[test]
fn test_no_degenerate_source_window_survives() {
    let mut ecg = wave(2000, 60.0);
    let mut resp = wave(2000, 400.0);
    for v in ecg[400..700].iter_mut() {
        *v = -1.0;
    }
    for v in resp[1200..1500].iter_mut() {
        *v = 3.0;
    }
    let recording = PatientRecording::new(ecg, resp);
    let builder = WindowBuilder::new(WindowParams::new(100, 20, 0.5).unwrap());

    let flat = builder
        .patient_windows(&recording)
        .filter(|(ecg, resp)| is_degenerate(ecg) || is_degenerate(resp))
        .count();
    let total = builder.patient_windows(&recording).count();
    assert!(flat > 0);
    assert_eq!(builder.surviving_windows(&recording), total - flat);

    let data = dataset(vec![(1, recording.ecg.clone(), recording.resp.clone())]);
    let windows = builder.build_partition(&data, &[1], Partition::Train).unwrap();
    assert_eq!(windows.len(), total - flat);
}

#[test]
fn test_overlapping_windows_stay_in_bounds() {
    // step = 100, floor(1000 / 100) = 10 步，但最后一个完整窗口起点为 800
    let params = WindowParams::new(200, 64, 0.5).unwrap();
    let starts: Vec<usize> = params.window_starts(1000).collect();
    assert_eq!(starts, vec![0, 100, 200, 300, 400, 500, 600, 700, 800]);

    // overlap > 1 留出间隔
    let params = WindowParams::new(200, 64, 1.5).unwrap();
    let starts: Vec<usize> = params.window_starts(1000).collect();
    assert_eq!(starts, vec![0, 300, 600]);

    // 尾部不足一个窗口的样本被丢弃
    let params = WindowParams::new(200, 64, 1.0).unwrap();
    assert_eq!(params.window_starts(999).count(), 4);
}

#[test]
fn test_mismatched_lengths_are_clamped() {
    let recording = PatientRecording::new(wave(1000, 50.0), wave(650, 300.0));
    let builder = WindowBuilder::new(WindowParams::new(200, 64, 1.0).unwrap());

    let pairs: Vec<_> = builder.patient_windows(&recording).collect();
    assert_eq!(pairs.len(), 3);
    for (ecg, resp) in pairs {
        assert_eq!(ecg.len(), 200);
        assert_eq!(resp.len(), 200);
    }
}

#[test]
fn test_row_order_follows_patient_list() {
    let a = (wave(400, 50.0), wave(400, 150.0));
    let b = (wave(400, 23.0), wave(400, 170.0));
    let data = dataset(vec![
        (1, a.0.clone(), a.1.clone()),
        (2, b.0.clone(), b.1.clone()),
        (3, a.0.clone(), a.1.clone()),
        (4, a.0.clone(), a.1.clone()),
    ]);
    let builder = WindowBuilder::new(WindowParams::new(200, 32, 1.0).unwrap());

    let forward = builder.build_partition(&data, &[1, 2], Partition::Train).unwrap();
    let reverse = builder.build_partition(&data, &[2, 1], Partition::Train).unwrap();
    let only_b = builder.build_partition(&data, &[2], Partition::Train).unwrap();

    assert_eq!(forward.len(), 4);
    // 患者 2 的窗口排在患者 1 之后
    assert_eq!(forward.ecg.slice(ndarray::s![2..4, .., ..]), only_b.ecg);
    assert_eq!(reverse.ecg.slice(ndarray::s![0..2, .., ..]), only_b.ecg);
    assert_eq!(reverse.resp.slice(ndarray::s![0..2, .., ..]), only_b.resp);
}

#[test]
fn test_repeated_runs_are_identical() {
    let data = dataset(vec![
        (1, wave(1500, 47.0), wave(1500, 330.0)),
        (2, wave(1500, 53.0), wave(1500, 290.0)),
        (3, wave(1500, 61.0), wave(1500, 410.0)),
    ]);

    let first = sliding_window(&data, 300, 100, 0.75, &[1], &[2], &[3]).unwrap();
    let second = sliding_window(&data, 300, 100, 0.75, &[1], &[2], &[3]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_patient_fails() {
    let data = dataset(vec![
        (1, ramp(1000), ramp(1000)),
        (2, ramp(1000), ramp(1000)),
    ]);

    match sliding_window(&data, 200, 64, 1.0, &[1], &[2], &[99]) {
        Err(SignalsError::PatientNotFound { patient, partition }) => {
            assert_eq!(patient, 99);
            assert_eq!(partition, Partition::Test);
        }
        other => panic!("expected PatientNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_constant_signal_gives_empty_partition() {
    let data = dataset(vec![
        (1, ramp(1000), ramp(1000)),
        (2, vec![0.7; 1000], ramp(1000)),
        (3, ramp(1000), ramp(1000)),
    ]);

    match sliding_window(&data, 200, 64, 1.0, &[1], &[2], &[3]) {
        Err(SignalsError::EmptyPartition(partition)) => {
            assert_eq!(partition, Partition::Validation);
        }
        other => panic!("expected EmptyPartition, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_empty_patient_list_gives_empty_partition() {
    let data = dataset(vec![(1, ramp(1000), ramp(1000))]);
    let builder = WindowBuilder::new(WindowParams::new(200, 64, 1.0).unwrap());

    let err = builder.build_partition(&data, &[], Partition::Test).unwrap_err();
    assert!(matches!(err, SignalsError::EmptyPartition(Partition::Test)));
}

#[test]
fn test_short_recording_gives_no_windows() {
    let data = dataset(vec![(1, ramp(150), ramp(150))]);
    let builder = WindowBuilder::new(WindowParams::new(200, 64, 1.0).unwrap());

    assert_eq!(builder.surviving_windows(&data[&1]), 0);
    assert!(builder.build_partition(&data, &[1], Partition::Train).is_err());
}

#[test]
fn test_invalid_parameters() {
    let data = dataset(vec![(1, ramp(1000), ramp(1000))]);

    for (window_size, downsampled, overlap) in [
        (0, 64, 1.0),
        (200, 0, 1.0),
        (200, 64, 0.0),
        (200, 64, -1.0),
        (200, 64, f64::NAN),
        (3, 64, 0.2),
    ] {
        let result = sliding_window(&data, window_size, downsampled, overlap, &[1], &[1], &[1]);
        assert!(
            matches!(result, Err(SignalsError::InvalidParameter(_))),
            "({}, {}, {}) should be rejected",
            window_size,
            downsampled,
            overlap
        );
    }
}

#[test]
fn test_overlapping_split_is_rejected() {
    let data = dataset(vec![(1, ramp(1000), ramp(1000)), (2, ramp(1000), ramp(1000))]);
    let result = sliding_window(&data, 200, 64, 1.0, &[1, 2], &[2], &[1]);
    assert!(matches!(result, Err(SignalsError::OverlappingPartitions { patient: 2, .. })));
}

#[test]
fn test_nan_samples_are_filtered() {
    let mut ecg = wave(600, 45.0);
    ecg[350] = f64::NAN;
    let data = dataset(vec![(1, ecg, wave(600, 250.0))]);
    let builder = WindowBuilder::new(WindowParams::new(200, 40, 1.0).unwrap());

    let windows = builder.build_partition(&data, &[1], Partition::Train).unwrap();
    assert_eq!(windows.len(), 2);
    assert!(windows.ecg.iter().all(|v| v.is_finite()));
}

#[test]
fn test_resampled_output_is_near_normalized_range() {
    let data = dataset(vec![(1, wave(2000, 80.0), wave(2000, 500.0))]);
    let builder = WindowBuilder::new(WindowParams::new(400, 100, 1.0).unwrap());
    let windows = builder.build_partition(&data, &[1], Partition::Train).unwrap();

    // 整周期的 ECG 窗口重采样后仍在归一化范围内
    for &v in windows.ecg.iter() {
        assert!(v >= -0.5001 && v <= 0.5001, "ecg value {} out of range", v);
    }
    for &v in windows.resp.iter() {
        // 非整周期窗口在边界处有 Gibbs 过冲
        assert!(v > -0.3 && v < 1.3, "resp value {} out of range", v);
    }
}
