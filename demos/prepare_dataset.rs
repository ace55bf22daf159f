use biosignal_windows::{DataLoader, DatasetConfig, PatientSplit, Result, WindowBuilder, WindowParams};
use log::{error, info};

// BIDMC 采样率 125 Hz：8 秒窗口，50% 重叠，降采样到 256 点
const WINDOW_SIZE: usize = 1000;
const DOWNSAMPLED_WINDOW_SIZE: usize = 256;
const OVERLAP: f64 = 0.5;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Biosignal windowing example");
    println!("Library Version: {}", biosignal_windows::version());

    let mut config = DatasetConfig::default();
    if let Some(root) = std::env::args().nth(1) {
        config = config.with_root(root);
    }

    let loaded = DataLoader::new(config.clone()).load()?;
    if loaded.patients.len() < 3 {
        error!(
            "need at least 3 patients under {}, found {}",
            config.root.display(),
            loaded.patients.len()
        );
        println!("Download the BIDMC dataset or pass a dataset root as the first argument.");
        return Ok(());
    }

    // 按患者编号 70/15/15 划分
    let mut patients = loaded.patients.clone();
    patients.sort_unstable();
    let n = patients.len();
    let n_train = (n * 70 / 100).clamp(1, n - 2);
    let n_validation = (n * 15 / 100).clamp(1, n - n_train - 1);
    let test = patients.split_off(n_train + n_validation);
    let validation = patients.split_off(n_train);
    let split = PatientSplit::new(patients, validation, test)?;

    let params = WindowParams::new(WINDOW_SIZE, DOWNSAMPLED_WINDOW_SIZE, OVERLAP)?;
    let dataset = WindowBuilder::new(params).build(&loaded.data, &split)?;

    for partition in biosignal_windows::Partition::ALL {
        let windows = dataset.partition(partition);
        info!(
            "{}: ecg {:?}, resp {:?}",
            partition,
            windows.ecg.shape(),
            windows.resp.shape()
        );
    }

    Ok(())
}
