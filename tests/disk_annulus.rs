use approx::assert_relative_eq;
use tmm_solver::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const STEEL_DENSITY: f64 = 7.85e-9;
const GRAVITY: f64 = 9810.0;

/// Solve a disk clamped at its bore; `load` receives the assembly and the outer node
fn solve_clamped_disk(
    disk: Disk,
    mode: u32,
    options: AnalysisOptions,
    load: impl FnOnce(&mut Assembly, NodeId),
) -> [f64; 4] {
    let mut assembly = Assembly::with_options(options);
    let id = assembly.add_element(disk);
    let [inner, outer] = assembly.element_nodes(id).unwrap();
    assembly.assemble(mode).unwrap();
    assembly.fix_node(inner).unwrap();
    load(&mut assembly, outer);
    assembly.solve().unwrap();
    assembly.node_displacements(outer).unwrap()
}

#[test]
fn test_lame_annulus_radial_tension() {
    init_logging();

    let (a, b, t) = (50.0, 200.0, 10.0);
    let n_outer = 1000.0;
    let steel = Material::steel();
    let disk = Disk::new(a, b, t, steel, 0).unwrap();

    let outer = solve_clamped_disk(disk, 0, AnalysisOptions::default(), |asm, node| {
        // Resultant r N_r at the rim
        let dof = asm.node_dof(node, 0).unwrap();
        asm.apply_force(b * n_outer, dof).unwrap();
    });

    // Plane stress u = A r + B / r with u(a) = 0
    let k = steel.plane_stress_modulus() * t;
    let amp = n_outer / (k * ((1.0 + steel.nu) + (1.0 - steel.nu) * a * a / (b * b)));
    let expected = amp * (b - a * a / b);

    assert_relative_eq!(outer[0], expected, max_relative = 1e-6);
    assert!(outer[1].abs() < 1e-12);
    assert!(outer[2].abs() < 1e-12);
}

#[test]
fn test_gravity_sag_converges_with_samples() {
    init_logging();

    let gravity = Gravity::new(GRAVITY, STEEL_DENSITY);
    let disk = || {
        Disk::new(20.0, 200.0, 8.0, Material::steel(), 0)
            .unwrap()
            .with_gravity(gravity)
    };

    let coarse = solve_clamped_disk(disk(), 0, AnalysisOptions::default(), |_, _| {});
    let fine_options = AnalysisOptions::default()
        .with_integration(IntegrationOptions::default().with_samples(3, 300));
    let fine = solve_clamped_disk(disk(), 0, fine_options, |_, _| {});

    println!("rim sag: {:.6e} (10 samples), {:.6e} (300 samples)", coarse[2], fine[2]);
    assert!(fine[2] < 0.0);
    assert_relative_eq!(coarse[2], fine[2], max_relative = 0.03);
}

#[test]
fn test_tapered_disk_is_stiffer_than_thin_disk() {
    init_logging();

    let rim_deflection = |disk: Disk| {
        let outer = solve_clamped_disk(disk, 0, AnalysisOptions::default(), |asm, node| {
            let dof = asm.node_dof(node, 2).unwrap();
            asm.apply_force(-100.0, dof).unwrap();
        });
        outer[2]
    };

    let thin = rim_deflection(Disk::new(20.0, 200.0, 4.0, Material::steel(), 0).unwrap());
    let tapered = rim_deflection(
        Disk::new(20.0, 200.0, 12.0, Material::steel(), 0)
            .unwrap()
            .with_taper(4.0, Taper::PowerLaw)
            .unwrap(),
    );
    let thick = rim_deflection(Disk::new(20.0, 200.0, 12.0, Material::steel(), 0).unwrap());

    assert!(thin < 0.0 && tapered < 0.0 && thick < 0.0);
    assert!(thick.abs() < tapered.abs());
    assert!(tapered.abs() < thin.abs());
}

#[test]
fn test_higher_mode_disk_stiffness_is_symmetric() {
    init_logging();

    let mut assembly = Assembly::new();
    let id = assembly.add_element(Disk::new(40.0, 160.0, 6.0, Material::steel(), 2).unwrap());
    let (k, _) = assembly.element_stiffness_and_load(id).unwrap();

    let scale = k.amax();
    for i in 0..8 {
        for j in 0..8 {
            let (a, b) = (k[(i, j)], k[(j, i)]);
            assert!(
                (a - b).abs() <= 1e-6 * (a.abs() + b.abs()) + 1e-9 * scale,
                "K[{},{}] = {} but K[{},{}] = {}",
                i,
                j,
                a,
                j,
                i,
                b
            );
        }
    }
}

#[test]
fn test_disk_rejects_wrong_mode() {
    init_logging();

    let mut assembly = Assembly::new();
    assembly.add_element(Disk::new(40.0, 160.0, 6.0, Material::steel(), 1).unwrap());
    assert!(matches!(
        assembly.assemble(0),
        Err(TmmError::ModeMismatch { element: 0, expected: 0, found: 1 })
    ));
}
