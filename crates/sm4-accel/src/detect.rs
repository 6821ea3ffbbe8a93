//! Runtime CPU capability checks for the hardware backends.

use log::debug;
use sm4_core::Backend;

/// Reports whether `backend` can run on this CPU.
///
/// The reference backend is always available. Hardware backends need x86-64 and
/// the instruction-set extensions their kernels use: AES-NI with SSSE3, or GFNI
/// with SSSE3.
pub fn is_supported(backend: Backend) -> bool {
    match backend {
        Backend::Reference => true,
        #[cfg(target_arch = "x86_64")]
        Backend::AesNi => crate::x86::AesNiSbox::detect().is_some(),
        #[cfg(target_arch = "x86_64")]
        Backend::Gfni => crate::x86::GfniSbox::detect().is_some(),
        #[cfg(not(target_arch = "x86_64"))]
        Backend::AesNi | Backend::Gfni => false,
    }
}

/// Every backend this CPU supports, in [`Backend::ALL`] order.
pub fn supported_backends() -> Vec<Backend> {
    Backend::ALL.into_iter().filter(|&b| is_supported(b)).collect()
}

/// Fastest supported backend: GFNI, then AES-NI, then the reference tables.
pub fn best_backend() -> Backend {
    let best = [Backend::Gfni, Backend::AesNi]
        .into_iter()
        .find(|&b| is_supported(b))
        .unwrap_or(Backend::Reference);
    debug!("sm4: best available backend is {best}");
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_is_always_supported() {
        assert!(is_supported(Backend::Reference));
        assert_eq!(supported_backends()[0], Backend::Reference);
    }

    #[test]
    fn best_backend_is_supported() {
        let best = best_backend();
        assert!(is_supported(best));
        assert!(supported_backends().contains(&best));
        if is_supported(Backend::Gfni) {
            assert_eq!(best, Backend::Gfni);
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    #[test]
    fn hardware_backends_need_x86_64() {
        assert_eq!(supported_backends(), vec![Backend::Reference]);
    }
}
