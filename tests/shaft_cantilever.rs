use approx::assert_relative_eq;
use std::f64::consts::PI;
use tmm_solver::prelude::*;

const D: f64 = 50.0;
const L: f64 = 1000.0;
const F: f64 = -1000.0;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn euler_bernoulli_tip() -> f64 {
    let i = PI * D.powi(4) / 64.0;
    F * L.powi(3) / (3.0 * Material::steel().e * i)
}

fn shaft(start: f64, end: f64, theory: BeamTheory) -> Shaft {
    Shaft::solid(D, Material::steel(), start, end, theory).unwrap()
}

/// Clamp the root node, load the tip transversely, return the tip displacements
fn solve_cantilever(assembly: &mut Assembly, root: NodeId, tip: NodeId) -> [f64; 4] {
    assembly.assemble(0).unwrap();
    assembly.fix_node(root).unwrap();
    let tip_w = assembly.node_dof(tip, 0).unwrap();
    assembly.apply_force(F, tip_w).unwrap();
    assembly.solve().unwrap();
    assembly.node_displacements(tip).unwrap()
}

#[test]
fn test_timoshenko_cantilever_tip_deflection() {
    init_logging();

    let mut assembly = Assembly::new();
    let id = assembly.add_element(shaft(0.0, L, BeamTheory::Timoshenko));
    let [root, tip] = assembly.element_nodes(id).unwrap();
    let tip_disp = solve_cantilever(&mut assembly, root, tip);

    let expected = euler_bernoulli_tip();
    println!("tip w = {:.6} mm (Euler-Bernoulli {:.6} mm)", tip_disp[0], expected);

    assert!(tip_disp[0] < 0.0);
    assert!(((tip_disp[0] - expected) / expected).abs() < 0.03);
    // Shear flexibility only adds deflection
    assert!(tip_disp[0].abs() > expected.abs());
    // Transverse load does not excite extension or torsion
    assert!(tip_disp[2].abs() < 1e-9);
    assert!(tip_disp[3].abs() < 1e-9);
}

#[test]
fn test_euler_bernoulli_cantilever_is_exact() {
    init_logging();

    let mut assembly = Assembly::new();
    let id = assembly.add_element(shaft(0.0, L, BeamTheory::EulerBernoulli));
    let [root, tip] = assembly.element_nodes(id).unwrap();
    let tip_disp = solve_cantilever(&mut assembly, root, tip);

    let ei = Material::steel().e * PI * D.powi(4) / 64.0;
    assert_relative_eq!(tip_disp[0], euler_bernoulli_tip(), max_relative = 1e-8);
    assert_relative_eq!(tip_disp[1], F * L * L / (2.0 * ei), max_relative = 1e-8);
}

#[test]
fn test_chained_shaft_matches_single_element() {
    init_logging();

    let mut single = Assembly::new();
    let id = single.add_element(shaft(0.0, L, BeamTheory::Timoshenko));
    let [root, tip] = single.element_nodes(id).unwrap();
    let single_tip = solve_cantilever(&mut single, root, tip);

    let mut chained = Assembly::new();
    let first = chained.add_element(shaft(0.0, L / 2.0, BeamTheory::Timoshenko));
    let second = chained
        .add_element_after(shaft(L / 2.0, L, BeamTheory::Timoshenko), first)
        .unwrap();
    let [root, _] = chained.element_nodes(first).unwrap();
    let [_, tip] = chained.element_nodes(second).unwrap();
    let chained_tip = solve_cantilever(&mut chained, root, tip);

    assert_eq!(chained.variable_count(), 12);
    assert_relative_eq!(chained_tip[0], single_tip[0], max_relative = 1e-8);
    assert_relative_eq!(chained_tip[1], single_tip[1], max_relative = 1e-8);
}

#[test]
fn test_support_reactions_balance_load() {
    init_logging();

    let mut assembly = Assembly::new();
    let id = assembly.add_element(shaft(0.0, L, BeamTheory::Timoshenko));
    let [root, tip] = assembly.element_nodes(id).unwrap();
    solve_cantilever(&mut assembly, root, tip);

    let reactions = assembly.reactions().unwrap();
    let shear = reactions[assembly.node_dof(root, 0).unwrap()];
    let moment = reactions[assembly.node_dof(root, 1).unwrap()];

    assert_relative_eq!(shear, -F, max_relative = 1e-6);
    assert_relative_eq!(moment.abs(), F.abs() * L, max_relative = 1e-6);

    // Free DOFs are in equilibrium
    for local in 0..4 {
        let dof = assembly.node_dof(tip, local).unwrap();
        assert!(reactions[dof].abs() < 1e-6 * F.abs());
    }
}

#[test]
fn test_axial_and_torsion_load() {
    init_logging();

    let mut assembly = Assembly::new();
    let id = assembly.add_element(shaft(0.0, L, BeamTheory::Timoshenko));
    let [root, tip] = assembly.element_nodes(id).unwrap();
    assembly.assemble(0).unwrap();
    assembly.fix_node(root).unwrap();
    assembly.apply_force(5000.0, assembly.node_dof(tip, 2).unwrap()).unwrap();
    assembly.apply_moment(2.0e5, assembly.node_dof(tip, 3).unwrap()).unwrap();
    assembly.solve().unwrap();

    let section = CircularSection::solid(D).unwrap();
    let steel = Material::steel();
    let tip_disp = assembly.node_displacements(tip).unwrap();
    assert_relative_eq!(tip_disp[2], 5000.0 * L / (steel.e * section.area()), max_relative = 1e-8);
    assert_relative_eq!(
        tip_disp[3],
        2.0e5 * L / (steel.shear_modulus() * section.polar_moment()),
        max_relative = 1e-8
    );
}

#[test]
fn test_unconstrained_shaft_reports_singularity() {
    init_logging();

    let mut assembly = Assembly::new();
    assembly.add_element(shaft(0.0, L, BeamTheory::Timoshenko));
    assembly.assemble(0).unwrap();
    assembly.apply_force(F, 4).unwrap();

    match assembly.solve() {
        Err(TmmError::SingularMatrix { pivot }) => assert!(pivot < 8),
        other => panic!("expected a singular system, got {:?}", other),
    }
}

#[test]
fn test_prescribed_tip_deflection() {
    init_logging();

    let mut assembly = Assembly::new();
    let id = assembly.add_element(shaft(0.0, L, BeamTheory::EulerBernoulli));
    let [root, tip] = assembly.element_nodes(id).unwrap();
    assembly.assemble(0).unwrap();
    assembly.fix_node(root).unwrap();

    let delta = -2.0;
    let tip_w = assembly.node_dof(tip, 0).unwrap();
    assembly.prescribe_displacement(delta, tip_w).unwrap();
    assembly.solve().unwrap();

    assert_relative_eq!(assembly.displacement(tip_w).unwrap(), delta, max_relative = 1e-12);

    // Free tip moment: θ = 3δ / 2L, held by a tip force 3EIδ / L³
    let ei = Material::steel().e * PI * D.powi(4) / 64.0;
    let tip_disp = assembly.node_displacements(tip).unwrap();
    assert_relative_eq!(tip_disp[1], 1.5 * delta / L, max_relative = 1e-8);

    let reactions = assembly.reactions().unwrap();
    assert_relative_eq!(reactions[tip_w], 3.0 * ei * delta / L.powi(3), max_relative = 1e-6);
    let root_w = assembly.node_dof(root, 0).unwrap();
    assert_relative_eq!(reactions[root_w], -reactions[tip_w], max_relative = 1e-6);
}
