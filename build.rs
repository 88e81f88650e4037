use std::cmp::Ordering;
use std::env;
use std::process::Command;

// Packed f32x4 backends the crate can compile against
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    // Spellings of the feature in /proc/cpuinfo or sysctl output
    probes: &'static [&'static str],
    target_arch: &'static str,
    cfg_flag: &'static str,
    detected: bool,
}

impl CpuFeature {
    // Lowest number == Highest Priority
    fn priority(&self) -> usize {
        match self.name {
            "neon" => 0,
            "sse2" => 1,
            _ => usize::MAX,
        }
    }

    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse2",
                probes: &["sse2", "hw.optional.sse2: 1"],
                target_arch: "x86_64",
                cfg_flag: "sse",
                detected: false,
            },
            CpuFeature {
                name: "neon",
                probes: &["asimd", "neon", "hw.optional.neon: 1"],
                target_arch: "aarch64",
                cfg_flag: "neon",
                detected: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            let contents = cpuinfo.to_lowercase();
            for feature in features.iter_mut() {
                feature.detected = feature.probes.iter().any(|p| contents.contains(p));
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();
            for feature in features.iter_mut() {
                feature.detected = feature
                    .probes
                    .iter()
                    .filter(|p| p.starts_with("hw.optional"))
                    .any(|p| contents.contains(p));
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        for detector in Self::cpu_features_detectors() {
            if detector.is_applicable() {
                detector.detect_features(features);
                break;
            }
        }
    }

    // SSE2 is part of the x86_64 baseline and NEON of the aarch64 one, so a
    // cross build can still pick the vector backend for its target.
    fn assume_baseline(features: &mut [CpuFeature], target_arch: &str) {
        for feature in features.iter_mut() {
            if feature.target_arch == target_arch {
                feature.detected = true;
            }
        }
    }

    fn apply(features: &mut [CpuFeature], target_arch: &str, requested: Option<String>) {
        features.sort();

        let available = |flag: &str| {
            features
                .iter()
                .any(|f| f.cfg_flag == flag && f.detected && f.target_arch == target_arch)
        };

        let detected = features
            .iter()
            .find(|f| f.detected && f.target_arch == target_arch)
            .map(|f| f.cfg_flag)
            .unwrap_or("fallback");

        let cfg_flag = match requested.as_deref() {
            None | Some("") | Some("auto") => detected,
            Some("scalar") | Some("fallback") => "fallback",
            Some(flag) if available(flag) => match flag {
                "sse" => "sse",
                _ => "neon",
            },
            Some(other) => {
                println!(
                    "cargo:warning=PARMUL_SIMD={other} is not usable on {target_arch}, using {detected}"
                );
                detected
            }
        };

        println!("cargo:rustc-cfg={cfg_flag}");

        println!("cargo::rustc-check-cfg=cfg(sse)");
        println!("cargo::rustc-check-cfg=cfg(neon)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PARMUL_SIMD");

    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let requested = env::var("PARMUL_SIMD").ok().map(|v| v.to_lowercase());

    let mut features = CpuFeature::features();

    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();

    // Only probe the CPU for native builds
    if host == target {
        PlatformDetector::detect_cpu_features(&mut features);
    } else {
        PlatformDetector::assume_baseline(&mut features, &target_arch);
    }

    PlatformDetector::apply(&mut features, &target_arch, requested);
}
