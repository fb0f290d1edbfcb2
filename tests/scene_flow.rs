//! End-to-end scene behavior through the public API.

use conifer::frame::CameraFrame;
use conifer::morph::Mode;
use conifer::photo::{PhotoData, ZOOM_DISTANCE};
use conifer::placement;
use conifer::scene::{Scene, SceneEvent};
use conifer::shape::{RadiusBand, TreeShape};
use conifer::state::PhotoStatus;
use glam::{Quat, Vec3};

fn photos(n: usize) -> Vec<PhotoData> {
    (0..n)
        .map(|i| PhotoData {
            id: format!("p{i}"),
            url: format!("photos/{i}.jpg"),
            description: None,
            date: None,
        })
        .collect()
}

fn test_shape() -> TreeShape {
    TreeShape {
        droop: 0.3,
        jitter: 0.4,
        ..TreeShape::default()
    }
}

#[test]
fn scatter_points_stay_inside_their_sphere() {
    let cloud = placement::uniform_sphere(1_000, 20.0);
    for p in cloud.iter() {
        assert!(p.length() <= 20.0001, "escaped the sphere: {p:?}");
    }
}

#[test]
fn cone_points_respect_the_silhouette() {
    let shape = test_shape();
    let cloud = placement::layered_cone(1_000, &shape);
    for p in cloud.iter() {
        assert!(p.y.abs() <= 6.5, "outside the height bound: {p:?}");
        let radial = (p.x * p.x + p.z * p.z).sqrt();
        assert!(radial <= shape.max_radius + 0.0001, "outside the cone: {p:?}");
    }
}

#[test]
fn selection_flow_matches_the_state_machine() {
    let mut scene = Scene::builder()
        .with_shape(test_shape())
        .with_foliage(200)
        .with_photos(photos(5))
        .build();

    scene.queue(SceneEvent::InteractPhoto(2));
    scene.update(1.0 / 60.0);
    assert_eq!(scene.state().selected_photo(), Some(2));
    assert_eq!(scene.state().photo_status(), PhotoStatus::Zoomed);

    scene.queue(SceneEvent::InteractPhoto(2));
    scene.update(1.0 / 60.0);
    assert_eq!(scene.state().photo_status(), PhotoStatus::Flipped);

    scene.queue(SceneEvent::SetMode(Mode::Chaos));
    scene.update(1.0 / 60.0);
    assert_eq!(scene.state().selected_photo(), None);
    assert_eq!(scene.state().photo_status(), PhotoStatus::Idle);
    assert_eq!(scene.state().mode(), Mode::Chaos);
}

#[test]
fn zoomed_photo_settles_ahead_of_the_camera() {
    let mut scene = Scene::builder()
        .with_shape(test_shape())
        .with_photos(photos(3))
        .build();

    let camera = CameraFrame {
        position: Vec3::new(0.0, 2.0, 18.0),
        rotation: Quat::IDENTITY,
        fov_y: None,
    };
    scene.queue(SceneEvent::SetCamera(camera));
    scene.queue(SceneEvent::SelectPhoto(1));

    // The tree keeps turning slowly underneath while the photo converges.
    let mut angle = 0.0f32;
    for _ in 0..900 {
        angle += 0.0005;
        scene.queue(SceneEvent::SetTreeTransform {
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_y(angle),
        });
        scene.update(1.0 / 60.0);
    }

    let (transform, status) = scene.photo_display(1).unwrap();
    assert_eq!(status, PhotoStatus::Zoomed);

    let parent_rotation = Quat::from_rotation_y(angle);
    let world = parent_rotation * transform.position;
    let expected = camera.point_ahead(ZOOM_DISTANCE);
    assert!(
        world.distance(expected) < 0.05,
        "photo at {world:?}, expected near {expected:?}"
    );
}

#[test]
fn chaos_and_back_returns_ornaments_to_their_rings() {
    let mut scene = Scene::builder()
        .with_shape(test_shape())
        .with_ornament_group("baubles", 64, 1.5, RadiusBand::new(0.7, 1.0))
        .build();

    scene.queue(SceneEvent::SetMode(Mode::Chaos));
    for _ in 0..300 {
        scene.update(1.0 / 60.0);
    }
    assert!(scene.groups()[0].morph.max_error(Mode::Chaos) < 0.05);

    scene.queue(SceneEvent::SetMode(Mode::Formed));
    for _ in 0..300 {
        scene.update(1.0 / 60.0);
    }
    assert!(scene.groups()[0].morph.max_error(Mode::Formed) < 0.05);
}

#[test]
fn uneven_frame_times_converge_like_even_ones() {
    use conifer::morph::Morph;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    let shape = test_shape();
    let build = || {
        let mut rng = SmallRng::seed_from_u64(7);
        Morph::new(
            placement::layered_cone_with_rng(32, &shape, &mut rng),
            placement::uniform_sphere_with_rng(32, 15.0, &mut rng),
            2.0,
        )
    };

    let mut even = build();
    let mut uneven = build();

    for _ in 0..120 {
        even.update(Mode::Chaos, 1.0 / 60.0);
    }
    // Same total time, chopped irregularly.
    for i in 0..60 {
        let dt = if i % 2 == 0 { 1.0 / 30.0 - 0.005 } else { 1.0 / 30.0 + 0.005 };
        uneven.update(Mode::Chaos, dt);
    }

    let a = even.max_error(Mode::Chaos);
    let b = uneven.max_error(Mode::Chaos);
    assert!((a - b).abs() < 1e-3, "even {a} vs uneven {b}");
}
