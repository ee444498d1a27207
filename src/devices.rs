//! Enumeration of the compute devices visible to this process.

use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub platform: String,
    pub name: String,
    pub compute_units: usize,
}

pub trait DeviceCatalog {
    fn devices(&self) -> Vec<DeviceInfo>;
}

/// The host processor. Accelerator runtimes plug in their own catalog.
#[derive(Debug, Default)]
pub struct HostCatalog;

impl DeviceCatalog for HostCatalog {
    fn devices(&self) -> Vec<DeviceInfo> {
        vec![DeviceInfo {
            platform: "host".into(),
            name: "cpu".into(),
            compute_units: num_cpus::get(),
        }]
    }
}

/// Human readable listing. In a distributed run each line carries the rank of the
/// process that sees the device.
pub fn render_listing(catalog: &dyn DeviceCatalog, rank: Option<usize>) -> String {
    let prefix = rank.map(|rank| format!("Process {rank}: ")).unwrap_or_default();
    let devices = catalog.devices();
    let mut listing = String::new();
    if devices.is_empty() {
        let _ = writeln!(listing, "{prefix}no devices available");
        return listing;
    }
    for (index, device) in devices.iter().enumerate() {
        let _ = writeln!(
            listing,
            "{prefix}[{index}] {} ({}), {} compute units",
            device.name, device.platform, device.compute_units
        );
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCatalog(Vec<DeviceInfo>);

    impl DeviceCatalog for FixedCatalog {
        fn devices(&self) -> Vec<DeviceInfo> {
            self.0.clone()
        }
    }

    #[test]
    fn test_host_catalog_has_cpu() {
        let devices = HostCatalog.devices();
        assert_eq!(devices.len(), 1);
        assert!(devices[0].compute_units >= 1);
    }

    #[test]
    fn test_listing_with_rank() {
        let catalog = FixedCatalog(vec![
            DeviceInfo {
                platform: "NVIDIA CUDA".into(),
                name: "GeForce GTX 1080".into(),
                compute_units: 20,
            },
            DeviceInfo {
                platform: "NVIDIA CUDA".into(),
                name: "Tesla K40c".into(),
                compute_units: 15,
            },
        ]);
        let listing = render_listing(&catalog, Some(2));
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Process 2: [0] GeForce GTX 1080 (NVIDIA CUDA), 20 compute units",
                "Process 2: [1] Tesla K40c (NVIDIA CUDA), 15 compute units",
            ]
        );
    }

    #[test]
    fn test_empty_listing() {
        let listing = render_listing(&FixedCatalog(vec![]), None);
        assert_eq!(listing, "no devices available\n");
    }
}
