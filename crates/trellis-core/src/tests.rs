#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::*;

    /// Leaf that counts the events it sees and optionally uses them.
    struct Probe {
        node: Node,
        seen: Arc<AtomicUsize>,
        consume: bool,
    }

    impl Probe {
        fn at(x: f32, y: f32, w: f32, h: f32, consume: bool) -> (Self, Arc<AtomicUsize>) {
            let seen = Arc::new(AtomicUsize::new(0));
            let mut node = Node::new();
            node.set_pos(Vec2::new(x, y));
            node.set_request(Size::new(w, h));
            (
                Self {
                    node,
                    seen: seen.clone(),
                    consume,
                },
                seen,
            )
        }
    }

    impl Widget for Probe {
        fn node(&self) -> &Node {
            &self.node
        }
        fn node_mut(&mut self) -> &mut Node {
            &mut self.node
        }
        fn handle_event(&mut self, _ev: &InputEvent) -> Response {
            self.seen.fetch_add(1, Ordering::SeqCst);
            if self.consume {
                Response::Used
            } else {
                Response::Ignored
            }
        }
    }

    fn grid_3x3() -> (Handle<Container>, Vec<NodeId>) {
        let mut root = Container::new();
        root.node_mut().set_request(Size::new(100.0, 100.0));
        root.node_mut().set_padding(Padding::all(5.0));
        let mut ids = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                let (p, _) = Probe::at(
                    5.0 + col as f32 * 30.0,
                    5.0 + row as f32 * 30.0,
                    29.0,
                    29.0,
                    true,
                );
                let r = NodeRef::new(p);
                ids.push(r.id());
                root.add(r);
            }
        }
        let root = Handle::new(root);
        root.node_ref().layout();
        (root, ids)
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF5733");
        assert_eq!(c, Color(255, 87, 51, 255));

        let c_alpha = Color::from_hex("#FF5733AA");
        assert_eq!(c_alpha, Color(255, 87, 51, 170));
    }

    #[test]
    fn test_padding_sentinel_resolves_to_metrics() {
        let n = Node::new();
        assert_eq!(n.padding(), Padding::all(Metrics::default().padding));

        let m = Metrics {
            padding: 9.0,
            ..Metrics::default()
        };
        with_metrics(m, || {
            let mut n = Node::new();
            n.set_padding(Padding {
                left: 2.0,
                ..Padding::UNSET
            });
            let p = n.padding();
            assert_eq!(p.left, 2.0);
            assert_eq!(p.right, 9.0);
        });
    }

    #[test]
    fn test_align_per_axis() {
        let a = Align::FILL_H.with_axis(Axis::Vertical, Align::BOTTOM);
        assert!(a.fills(Axis::Horizontal));
        assert!(!a.leading(Axis::Vertical));
        assert!(a.trailing(Axis::Vertical));
        assert_eq!(Align::empty().place(Axis::Horizontal, 0.0, 100.0, 20.0), 40.0);
        assert_eq!(Align::RIGHT.place(Axis::Horizontal, 0.0, 100.0, 20.0), 80.0);
    }

    #[test]
    fn test_add_is_idempotent_and_sets_parent() {
        let root = Container::new();
        let (p, _) = Probe::at(0.0, 0.0, 10.0, 10.0, false);
        let h = Handle::new(p);
        assert!(root.add(&h));
        assert!(!root.add(&h));
        assert_eq!(root.list().len(), 1);
        assert_eq!(h.lock().node().parent().map(|l| l.id()), Some(root.node().id()));
    }

    #[test]
    fn test_add_rejects_node_owned_elsewhere() {
        let a = Container::new();
        let b = Container::new();
        let (p, _) = Probe::at(0.0, 0.0, 10.0, 10.0, false);
        let h = Handle::new(p);
        assert!(a.add(&h));
        assert!(!b.add(&h));
        assert!(b.list().is_empty());

        let detached = a.remove(h.id()).expect("child present");
        assert!(detached.lock().node().parent().is_none());
        assert!(b.add(detached));
        assert!(a.remove(h.id()).is_none());
    }

    #[test]
    fn test_clear_erase_and_detach() {
        let root = Container::new();
        for _ in 0..3 {
            let (p, _) = Probe::at(0.0, 0.0, 1.0, 1.0, false);
            root.add(NodeRef::new(p));
        }
        let detached = root.clear(false);
        assert_eq!(detached.len(), 3);
        assert!(root.list().is_empty());
        assert!(detached.iter().all(|d| d.lock().node().parent().is_none()));

        root.add(detached[0].clone());
        assert!(root.clear(true).is_empty());
        assert!(root.list().is_empty());
    }

    #[test]
    fn test_hit_test_3x3() {
        let (root, ids) = grid_3x3();
        let w = root.lock();
        for row in 0..3 {
            for col in 0..3 {
                let p = Vec2::new(20.0 + col as f32 * 30.0, 20.0 + row as f32 * 30.0);
                assert_eq!(w.hit_test(p), Some(ids[row * 3 + col]));
            }
        }
        // padding area belongs to the container
        assert_eq!(w.hit_test(Vec2::new(2.0, 2.0)), Some(root.id()));
        assert_eq!(w.hit_test(Vec2::new(150.0, 150.0)), None);
    }

    #[test]
    fn test_hit_test_skips_hidden_and_inactive() {
        let (root, ids) = grid_3x3();
        let first = root.lock().list().get(0).expect("child");
        first.lock().node_mut().set_active(false);
        assert_eq!(root.lock().hit_test(Vec2::new(20.0, 20.0)), Some(root.id()));
        first.lock().node_mut().set_active(true);
        assert_eq!(root.lock().hit_test(Vec2::new(20.0, 20.0)), Some(ids[0]));
    }

    #[test]
    fn test_dispatch_first_match_wins() {
        let mut root = Container::new();
        root.node_mut().set_request(Size::new(50.0, 50.0));
        let (a, seen_a) = Probe::at(0.0, 0.0, 50.0, 50.0, false);
        let (b, seen_b) = Probe::at(0.0, 0.0, 50.0, 50.0, true);
        let (c, seen_c) = Probe::at(0.0, 0.0, 50.0, 50.0, true);
        root.add(NodeRef::new(a));
        root.add(NodeRef::new(b));
        root.add(NodeRef::new(c));
        let root = NodeRef::new(root);
        root.layout();

        let r = root.lock().handle_event(&InputEvent::press(Vec2::new(10.0, 10.0)));
        assert_eq!(r, Response::Used);
        // a saw it but passed, b used it, c never saw it
        assert_eq!(seen_a.load(Ordering::SeqCst), 1);
        assert_eq!(seen_b.load(Ordering::SeqCst), 1);
        assert_eq!(seen_c.load(Ordering::SeqCst), 0);

        let r = root.lock().handle_event(&InputEvent::press(Vec2::new(80.0, 80.0)));
        assert_eq!(r, Response::Ignored);
    }

    #[test]
    fn test_changed_recurses_into_children() {
        let (root, _) = grid_3x3();
        assert!(!root.lock().changed());
        let child = root.lock().list().get(4).expect("child");
        child.lock().node_mut().set_request(Size::new(10.0, 10.0));
        assert!(!root.lock().node().is_dirty());
        assert!(root.lock().changed());
        assert!(root.node_ref().layout());
        assert!(!root.lock().changed());
    }

    #[test]
    fn test_hidden_child_marks_parent_dirty() {
        let (root, _) = grid_3x3();
        let child = root.lock().list().get(0).expect("child");
        child.lock().node_mut().set_visible(false);
        assert!(root.lock().node().is_dirty());
    }

    #[test]
    fn test_structural_mutation_from_another_thread() {
        let root = Handle::new(Container::new());
        let list = root.lock().list().clone();
        let worker = std::thread::spawn(move || {
            for _ in 0..16 {
                let (p, _) = Probe::at(0.0, 0.0, 1.0, 1.0, false);
                list.add(NodeRef::new(p));
            }
        });
        for _ in 0..16 {
            root.node_ref().layout();
        }
        worker.join().expect("worker");
        assert_eq!(root.lock().list().len(), 16);
        root.node_ref().layout();
        assert!(!root.lock().changed());
    }

    #[test]
    fn test_find_reports_parent_origin() {
        let mut outer = Container::new();
        outer.node_mut().set_pos(Vec2::new(100.0, 50.0));
        let (p, _) = Probe::at(5.0, 5.0, 10.0, 10.0, false);
        let probe = NodeRef::new(p);
        outer.add(probe.clone());
        let root = Container::new();
        root.add(NodeRef::new(outer));

        let (found, origin) = root.list().find(probe.id(), Vec2::ZERO).expect("found");
        assert!(found.ptr_eq(&probe));
        assert_eq!(origin, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_fixed_measure() {
        let m = FixedMeasure::default();
        let s = m.measure("abcd", 10.0);
        assert_eq!(s, Size::new(20.0, 12.5));
    }

    #[test]
    fn test_take_capture_clears_request() {
        let mut outer = Container::new();
        outer.node_mut().set_pos(Vec2::new(20.0, 10.0));
        let (p, _) = Probe::at(0.0, 0.0, 10.0, 10.0, true);
        let probe = NodeRef::new(p);
        outer.add(probe.clone());
        let root = Container::new();
        root.add(NodeRef::new(outer));

        assert!(root.list().take_capture(Vec2::ZERO).is_none());
        probe.lock().node().capture_pointer();
        let (grabbed, origin) = root.list().take_capture(Vec2::ZERO).expect("captured");
        assert!(grabbed.ptr_eq(&probe));
        assert_eq!(origin, Vec2::new(20.0, 10.0));
        assert!(root.list().take_capture(Vec2::ZERO).is_none());
    }

    struct Recorder {
        frames: usize,
        last: Vec<SceneNode>,
    }

    impl RenderBackend for Recorder {
        fn configure_surface(&mut self, _width: u32, _height: u32) {}
        fn frame(&mut self, scene: &Scene) {
            self.frames += 1;
            self.last = scene.nodes.clone();
        }
    }

    #[test]
    fn test_scene_reaches_backend() {
        let mut scene = Scene::default();
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        scene.push_clip(r);
        scene.fill(r, Color::from_hex("#FF0000"), 2.0);
        scene.pop_clip();

        let mut backend = Recorder {
            frames: 0,
            last: Vec::new(),
        };
        backend.configure_surface(10, 10);
        backend.frame(&scene);
        assert_eq!(backend.frames, 1);
        assert_eq!(backend.last.len(), 3);
        assert_eq!(backend.last[2], SceneNode::PopClip);
    }
}
