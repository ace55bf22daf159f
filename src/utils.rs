/// 窗口的最小值和最大值
///
/// 含非有限值（NaN/inf）时返回 `None`。空切片同样返回 `None`。
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter();
    let first = *iter.next()?;
    if !first.is_finite() {
        return None;
    }

    let mut min = first;
    let mut max = first;
    for &v in iter {
        if !v.is_finite() {
            return None;
        }
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    Some((min, max))
}

/// 检查窗口是否退化（所有值相等，或包含非有限值）
pub fn is_degenerate(values: &[f64]) -> bool {
    match finite_range(values) {
        Some((min, max)) => min >= max,
        None => true,
    }
}

/// 线性缩放到 [0, 1]
///
/// 退化窗口返回 `None`。
pub fn normalize_unit(values: &[f64]) -> Option<Vec<f64>> {
    let (min, max) = finite_range(values)?;
    if min >= max {
        return None;
    }

    let span = max - min;
    Some(values.iter().map(|&v| (v - min) / span).collect())
}

/// ECG 窗口归一化到 [-0.5, 0.5]
pub fn normalize_ecg(values: &[f64]) -> Option<Vec<f64>> {
    let mut normalized = normalize_unit(values)?;
    for v in normalized.iter_mut() {
        *v -= 0.5;
    }
    Some(normalized)
}

/// 呼吸窗口归一化到 [0, 1]
pub fn normalize_resp(values: &[f64]) -> Option<Vec<f64>> {
    normalize_unit(values)
}

/// 解析单个数值单元格，空值或非法值记为 NaN
pub fn parse_sample(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return f64::NAN;
    }

    s.parse().unwrap_or(f64::NAN)
}
