//! Flat ΛCDM distances for converting physical sizes into angular sizes.

use serde::{Deserialize, Serialize};

/// Speed of light in km/s.
const C_KM_S: f64 = 299_792.458;
/// Kiloparsecs per megaparsec.
const KPC_PER_MPC: f64 = 1.0e3;
/// Arcminutes per radian.
const ARCMIN_PER_RAD: f64 = 10_800.0 / std::f64::consts::PI;

// ---------------------------------------------------------------------------
// FlatLambdaCdm
// ---------------------------------------------------------------------------

/// Flat matter + dark-energy cosmology (no radiation term).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatLambdaCdm {
    /// Hubble constant in km/s/Mpc.
    pub h0: f64,
    /// Matter density today, as a fraction of critical.
    pub om0: f64,
}

impl Default for FlatLambdaCdm {
    /// The fiducial model used across the survey analysis: H0 = 70, Ωm = 0.3.
    fn default() -> Self {
        Self { h0: 70.0, om0: 0.3 }
    }
}

impl FlatLambdaCdm {
    /// Hubble distance c / H0 in Mpc.
    pub fn hubble_distance_mpc(&self) -> f64 {
        C_KM_S / self.h0
    }

    /// Dimensionless Hubble parameter E(z).
    pub fn efunc(&self, z: f64) -> f64 {
        let a = 1.0 + z;
        (self.om0 * a * a * a + (1.0 - self.om0)).sqrt()
    }

    /// Line-of-sight comoving distance in Mpc.
    ///
    /// Simpson integration of 1/E(z); the panel count scales with redshift
    /// so survey-depth redshifts stay well below the distance precision
    /// anyone reads off a plot.
    pub fn comoving_distance_mpc(&self, z: f64) -> f64 {
        if z <= 0.0 {
            return 0.0;
        }
        let mut n = ((z * 512.0).ceil() as usize).clamp(64, 16_384);
        if n % 2 == 1 {
            n += 1;
        }
        let h = z / n as f64;

        let mut sum = 1.0 / self.efunc(0.0) + 1.0 / self.efunc(z);
        for i in 1..n {
            let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
            sum += weight / self.efunc(i as f64 * h);
        }

        self.hubble_distance_mpc() * sum * h / 3.0
    }

    /// Angular diameter distance in Mpc (flat universe).
    pub fn angular_diameter_distance_mpc(&self, z: f64) -> f64 {
        self.comoving_distance_mpc(z) / (1.0 + z)
    }

    /// Proper transverse scale at redshift `z`, in kpc per arcminute.
    pub fn kpc_proper_per_arcmin(&self, z: f64) -> f64 {
        self.angular_diameter_distance_mpc(z) * KPC_PER_MPC / ARCMIN_PER_RAD
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Physical length units accepted by [`r_phy_to_ang`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Kpc,
    Mpc,
}

impl LengthUnit {
    fn to_kpc(self, value: f64) -> f64 {
        match self {
            LengthUnit::Kpc => value,
            LengthUnit::Mpc => value * KPC_PER_MPC,
        }
    }
}

/// Angular units for the converted size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleUnit {
    Arcsec,
    Arcmin,
    Degree,
    Radian,
}

impl AngleUnit {
    fn from_arcmin(self, value: f64) -> f64 {
        match self {
            AngleUnit::Arcmin => value,
            AngleUnit::Arcsec => value * 60.0,
            AngleUnit::Degree => value / 60.0,
            AngleUnit::Radian => value / ARCMIN_PER_RAD,
        }
    }
}

// ---------------------------------------------------------------------------
// r_phy_to_ang
// ---------------------------------------------------------------------------

/// Convert a physical size at `redshift` into an angular size on the sky.
///
/// The bare number is tagged with `phy_unit`, divided by the proper
/// transverse scale at the given redshift, and returned in `ang_unit`.
/// Falls back to the fiducial model when `cosmo` is `None`.
pub fn r_phy_to_ang(
    r_phy: f64,
    redshift: f64,
    cosmo: Option<&FlatLambdaCdm>,
    phy_unit: LengthUnit,
    ang_unit: AngleUnit,
) -> f64 {
    let fiducial = FlatLambdaCdm::default();
    let cosmo = cosmo.unwrap_or(&fiducial);

    let r_kpc = phy_unit.to_kpc(r_phy);
    let arcmin = r_kpc / cosmo.kpc_proper_per_arcmin(redshift);
    ang_unit.from_arcmin(arcmin)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
