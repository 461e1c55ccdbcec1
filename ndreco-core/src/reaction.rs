//! Neutrino reaction string handling.
//!
//! Converts generator reaction strings of the form
//! `"nu:14;tgt:1000180400;N:2112;proc:Weak[CC],QES;"` to Nuance-like
//! integer codes, and synthesises reaction strings from the (ccnc, mode)
//! pair stored in truth records.

/// Converts a generator reaction string to a Nuance-like integer code.
///
/// Only the basic reaction types are distinguished; specific final states
/// all map to the same code.
#[must_use]
pub fn nuance_code(reaction: &str) -> i32 {
    let mut code = 1000;

    let is_cc = reaction.contains("Weak[CC]"); // weak charged-current
    let is_nc = reaction.contains("Weak[NC]"); // weak neutral-current
    let is_qel = reaction.contains("QES"); // quasi-elastic scattering
    let is_dis = reaction.contains("DIS"); // deep inelastic scattering
    let is_res = reaction.contains("RES"); // resonance
    let is_cohpi = reaction.contains("COH"); // coherent pi
    let is_ve = reaction.contains("NuEEL"); // nu e elastic
    let is_imd = reaction.contains("IMD"); // inverse mu decay
    let is_mec = reaction.contains("MEC"); // meson exchange current

    if is_qel {
        code = 0;
        if is_cc {
            code = 1001;
        } else if is_nc {
            code = 1002;
        }
    } else if is_dis {
        code = 2;
        if is_cc {
            code = 1091;
        } else if is_nc {
            code = 1092;
        }
    } else if is_res {
        code = 1;
    } else if is_cohpi {
        code = 3;
    } else if is_ve {
        code = 1098;
    } else if is_imd {
        code = 1099;
    } else if is_mec {
        code = 10;
    }

    code
}

/// Builds the reaction string for a (ccnc, mode) truth pair.
#[must_use]
pub fn nuance_reaction(ccnc: i32, mode: i32) -> String {
    let mut reaction = String::from(match mode {
        0 => "QES",
        1 => "RES",
        2 => "DIS",
        3 => "COH",
        5 => "NuEEL",
        6 => "IMD",
        10 => "MEC",
        _ => "",
    });

    if ccnc == 0 {
        reaction += "Weak[CC]";
    } else if ccnc == 1 {
        reaction += "Weak[NC]";
    }

    reaction
}
