//! Unit alias catalog
//!
//! Every recognized alias maps to a canonical unit inside one quantity
//! category, with a linear factor to the category's pivot unit and, for
//! temperature only, an affine offset (`pivot = value * factor + offset`).
//! Pivots: meter, kilogram, second, kelvin, ampere, volt, ohm, liter,
//! pascal, newton, joule, watt.

use super::Quantity;

/// One canonical unit with all of its accepted aliases.
pub(crate) struct UnitSpec {
    pub aliases: &'static [&'static str],
    pub canonical: &'static str,
    pub quantity: Quantity,
    pub factor: f64,
    pub offset: f64,
}

const fn ratio(
    aliases: &'static [&'static str],
    canonical: &'static str,
    quantity: Quantity,
    factor: f64,
) -> UnitSpec {
    UnitSpec {
        aliases,
        canonical,
        quantity,
        factor,
        offset: 0.0,
    }
}

pub(crate) const CATALOG: &[UnitSpec] = &[
    // Length (pivot: meter)
    ratio(&["m", "meter", "metre", "meters", "metres"], "meter", Quantity::Length, 1.0),
    ratio(
        &["km", "kilometer", "kilometre", "kilometers", "kilometres"],
        "kilometer",
        Quantity::Length,
        1_000.0,
    ),
    ratio(&["cm", "centimeter", "centimetre"], "centimeter", Quantity::Length, 0.01),
    ratio(&["mm", "millimeter", "millimetre"], "millimeter", Quantity::Length, 0.001),
    ratio(&["mi", "mile", "miles"], "mile", Quantity::Length, 1_609.344),
    ratio(&["yd", "yard", "yards"], "yard", Quantity::Length, 0.9144),
    ratio(&["ft", "foot", "feet"], "foot", Quantity::Length, 0.3048),
    ratio(&["in", "inch", "inches"], "inch", Quantity::Length, 0.0254),
    ratio(&["nmi", "nauticalmile"], "nautical_mile", Quantity::Length, 1_852.0),
    // Mass (pivot: kilogram)
    ratio(&["kg", "kilogram", "kilograms"], "kilogram", Quantity::Mass, 1.0),
    ratio(&["g", "gram", "grams"], "gram", Quantity::Mass, 0.001),
    ratio(&["mg", "milligram", "milligrams"], "milligram", Quantity::Mass, 1e-6),
    ratio(&["t", "tonne", "tonnes", "ton"], "tonne", Quantity::Mass, 1_000.0),
    ratio(&["lb", "lbs", "pound", "pounds"], "pound", Quantity::Mass, 0.453_592_37),
    ratio(&["oz", "ounce", "ounces"], "ounce", Quantity::Mass, 0.028_349_523_125),
    // Duration (pivot: second)
    ratio(&["s", "sec", "second", "seconds"], "second", Quantity::Duration, 1.0),
    ratio(&["ms", "millisecond", "milliseconds"], "millisecond", Quantity::Duration, 0.001),
    ratio(&["min", "minute", "minutes"], "minute", Quantity::Duration, 60.0),
    ratio(&["h", "hr", "hour", "hours"], "hour", Quantity::Duration, 3_600.0),
    ratio(&["d", "day", "days"], "day", Quantity::Duration, 86_400.0),
    ratio(&["wk", "week", "weeks"], "week", Quantity::Duration, 604_800.0),
    // Temperature (pivot: kelvin; affine)
    ratio(&["k", "kelvin"], "kelvin", Quantity::Temperature, 1.0),
    UnitSpec {
        aliases: &["c", "celsius", "degc"],
        canonical: "celsius",
        quantity: Quantity::Temperature,
        factor: 1.0,
        offset: 273.15,
    },
    UnitSpec {
        aliases: &["f", "fahrenheit", "degf"],
        canonical: "fahrenheit",
        quantity: Quantity::Temperature,
        factor: 5.0 / 9.0,
        offset: 459.67 * 5.0 / 9.0,
    },
    // Electric current (pivot: ampere)
    ratio(&["a", "amp", "ampere", "amperes"], "ampere", Quantity::ElectricCurrent, 1.0),
    ratio(&["ma", "milliamp", "milliampere"], "milliampere", Quantity::ElectricCurrent, 0.001),
    ratio(&["ka", "kiloamp", "kiloampere"], "kiloampere", Quantity::ElectricCurrent, 1_000.0),
    // Electric potential (pivot: volt)
    ratio(&["v", "volt", "volts"], "volt", Quantity::ElectricPotential, 1.0),
    ratio(&["mv", "millivolt", "millivolts"], "millivolt", Quantity::ElectricPotential, 0.001),
    ratio(&["kv", "kilovolt", "kilovolts"], "kilovolt", Quantity::ElectricPotential, 1_000.0),
    // Electric resistance (pivot: ohm)
    ratio(&["ohm", "ohms"], "ohm", Quantity::ElectricResistance, 1.0),
    ratio(&["milliohm", "milliohms"], "milliohm", Quantity::ElectricResistance, 0.001),
    ratio(&["kohm", "kiloohm", "kiloohms"], "kiloohm", Quantity::ElectricResistance, 1_000.0),
    ratio(&["megohm", "megaohm", "megaohms"], "megaohm", Quantity::ElectricResistance, 1e6),
    // Volume (pivot: liter)
    ratio(&["l", "liter", "litre", "liters", "litres"], "liter", Quantity::Volume, 1.0),
    ratio(&["ml", "milliliter", "millilitre"], "milliliter", Quantity::Volume, 0.001),
    ratio(&["cl", "centiliter", "centilitre"], "centiliter", Quantity::Volume, 0.01),
    ratio(&["m3", "cubicmeter", "cubicmetre"], "cubic_meter", Quantity::Volume, 1_000.0),
    ratio(&["gal", "gallon", "gallons"], "gallon", Quantity::Volume, 3.785_411_784),
    // Pressure (pivot: pascal)
    ratio(&["pa", "pascal", "pascals"], "pascal", Quantity::Pressure, 1.0),
    ratio(&["hpa", "hectopascal"], "hectopascal", Quantity::Pressure, 100.0),
    ratio(&["kpa", "kilopascal"], "kilopascal", Quantity::Pressure, 1_000.0),
    ratio(&["mpa", "megapascal"], "megapascal", Quantity::Pressure, 1e6),
    ratio(&["bar"], "bar", Quantity::Pressure, 100_000.0),
    ratio(&["mbar", "millibar"], "millibar", Quantity::Pressure, 100.0),
    ratio(&["psi"], "psi", Quantity::Pressure, 6_894.757_293_168),
    ratio(&["atm", "atmosphere"], "atmosphere", Quantity::Pressure, 101_325.0),
    // Force (pivot: newton)
    ratio(&["n", "newton", "newtons"], "newton", Quantity::Force, 1.0),
    ratio(&["kn", "kilonewton", "kilonewtons"], "kilonewton", Quantity::Force, 1_000.0),
    ratio(&["lbf", "poundforce"], "pound_force", Quantity::Force, 4.448_221_615_260_5),
    ratio(&["kgf", "kilogramforce"], "kilogram_force", Quantity::Force, 9.806_65),
    // Energy (pivot: joule)
    ratio(&["j", "joule", "joules"], "joule", Quantity::Energy, 1.0),
    ratio(&["kj", "kilojoule", "kilojoules"], "kilojoule", Quantity::Energy, 1_000.0),
    ratio(&["cal", "calorie", "calories"], "calorie", Quantity::Energy, 4.184),
    ratio(&["kcal", "kilocalorie", "kilocalories"], "kilocalorie", Quantity::Energy, 4_184.0),
    ratio(&["wh", "watthour"], "watt_hour", Quantity::Energy, 3_600.0),
    ratio(&["kwh", "kilowatthour"], "kilowatt_hour", Quantity::Energy, 3.6e6),
    ratio(&["btu"], "btu", Quantity::Energy, 1_055.055_852_62),
    // Power (pivot: watt)
    ratio(&["w", "watt", "watts"], "watt", Quantity::Power, 1.0),
    ratio(&["kw", "kilowatt", "kilowatts"], "kilowatt", Quantity::Power, 1_000.0),
    ratio(&["megawatt", "megawatts"], "megawatt", Quantity::Power, 1e6),
    ratio(&["hp", "horsepower"], "horsepower", Quantity::Power, 745.699_871_582_27),
];
