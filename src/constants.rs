//! Physical constants in CGS units.

/// Planck constant (erg s).
pub const PLANCK: f64 = 6.626_070_15e-27;

/// Boltzmann constant (erg/K).
pub const BOLTZMANN: f64 = 1.380_649e-16;

/// Speed of light (cm/s).
pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e10;

/// Stefan-Boltzmann constant (erg/cm^2/K^4/s).
pub const STEFAN_BOLTZMANN: f64 = 5.670_374_419e-5;

/// Wien displacement constant in frequency form: nu_peak = WIEN_FREQUENCY * T (Hz/K).
pub const WIEN_FREQUENCY: f64 = 5.878_925_757e10;
