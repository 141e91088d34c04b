#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use trellis_core::*;
    use vek::{Mat4, Vec3};

    use crate::*;

    fn measure() -> Arc<dyn TextMeasure> {
        Arc::new(FixedMeasure::default())
    }

    fn block(w: f32, h: f32) -> Handle<Block> {
        Handle::new(Block::new(Size::new(w, h)))
    }

    /// Geometry of a subtree as JSON, for whole-layout comparisons.
    fn dump(n: &NodeRef) -> Value {
        let w = n.lock();
        let r = w.node().rect();
        let kids: Vec<Value> = w
            .children()
            .map(|c| c.snapshot().iter().map(dump).collect())
            .unwrap_or_default();
        if kids.is_empty() {
            json!({ "rect": [r.x, r.y, r.w, r.h] })
        } else {
            json!({ "rect": [r.x, r.y, r.w, r.h], "children": kids })
        }
    }

    fn pos_of<W: Widget + 'static>(h: &Handle<W>) -> Vec2 {
        h.lock().node().pos
    }

    fn size_of<W: Widget + 'static>(h: &Handle<W>) -> Size {
        h.lock().node().size()
    }

    #[test]
    fn test_row_places_children_with_spacing() {
        let mut row = Linear::row();
        row.node_mut().set_padding(Padding::all(5.0));
        row.set_spacing(2.0);
        row.add(block(10.0, 10.0));
        row.add(block(20.0, 15.0));
        let row = NodeRef::new(row);
        assert!(row.layout());

        assert_eq!(
            dump(&row),
            json!({
                "rect": [0.0, 0.0, 42.0, 25.0],
                "children": [
                    { "rect": [5.0, 5.0, 10.0, 10.0] },
                    { "rect": [17.0, 5.0, 20.0, 15.0] },
                ]
            })
        );
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut col = Linear::column();
        col.node_mut().set_align(Align::FILL_H | Align::TOP);
        col.add(block(10.0, 10.0));
        col.add(block(30.0, 12.0));
        let inner = Linear::row();
        inner.add(block(8.0, 8.0));
        col.add(NodeRef::new(inner));
        let col = NodeRef::new(col);

        assert!(col.layout());
        let first = dump(&col);
        assert!(!col.layout());
        col.lock().arrange();
        assert_eq!(dump(&col), first);
    }

    #[test]
    fn test_min_size_is_monotonic_and_respected() {
        let col = Handle::new(Linear::column());
        let mut last = col.lock().min_size();
        for i in 0..5 {
            col.lock().add(block(10.0 + i as f32 * 7.0, 6.0));
            let now = col.lock().min_size();
            assert!(now.width >= last.width && now.height >= last.height);
            last = now;
        }
        col.node_ref().layout();
        let size = size_of(&col);
        assert!(size.width >= last.width && size.height >= last.height);
    }

    #[test]
    fn test_hidden_children_take_no_space() {
        let mut row = Linear::row();
        row.node_mut().set_padding(Padding::ZERO);
        row.set_spacing(0.0);
        let a = block(10.0, 10.0);
        let b = block(10.0, 10.0);
        row.add(&a);
        row.add(&b);
        let row = Handle::new(row);
        let before = row.lock().min_size();
        a.lock().node_mut().set_visible(false);
        assert!(row.lock().changed());
        assert_eq!(row.lock().min_size().width, before.width - 10.0);
    }

    #[test]
    fn test_fill_cross_axis() {
        let mut col = Linear::column();
        col.node_mut().set_padding(Padding::ZERO);
        col.node_mut().set_align(Align::FILL_H | Align::TOP);
        let a = block(10.0, 5.0);
        let b = block(30.0, 5.0);
        col.add(&a);
        col.add(&b);
        NodeRef::new(col).layout();
        assert_eq!(size_of(&a).width, 30.0);
        assert_eq!(size_of(&b).width, 30.0);
    }

    #[test]
    fn test_filled_column_shrinks_with_its_request() {
        let mut col = Aligner::new(Axis::Vertical);
        col.node_mut().set_request(Size::new(200.0, 100.0));
        let child = block(20.0, 10.0);
        col.add(&child);
        let col = Handle::new(col);
        col.node_ref().layout();
        assert_eq!(size_of(&child), Size::new(192.0, 10.0));
        assert_eq!(size_of(&col), Size::new(200.0, 100.0));

        col.lock().node_mut().set_request(Size::new(100.0, 100.0));
        assert!(col.node_ref().layout());
        assert_eq!(size_of(&child), Size::new(92.0, 10.0));
        assert_eq!(size_of(&col), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_centered_run_with_slack() {
        let mut row = Linear::row();
        row.node_mut().set_padding(Padding::ZERO);
        row.node_mut().set_align(Align::empty());
        row.node_mut().set_autoscale(Autoscale::empty());
        row.node_mut().set_request(Size::new(100.0, 20.0));
        let a = block(20.0, 10.0);
        row.add(&a);
        NodeRef::new(row).layout();
        assert_eq!(pos_of(&a), Vec2::new(40.0, 5.0));
    }

    #[test]
    fn test_trailing_alignment_packs_to_far_edge() {
        let mut row = Linear::row();
        row.node_mut().set_padding(Padding::ZERO);
        row.set_spacing(0.0);
        row.node_mut().set_align(Align::RIGHT | Align::BOTTOM);
        row.node_mut().set_autoscale(Autoscale::empty());
        row.node_mut().set_request(Size::new(100.0, 20.0));
        let a = block(20.0, 10.0);
        let b = block(30.0, 10.0);
        row.add(&a);
        row.add(&b);
        NodeRef::new(row).layout();
        assert_eq!(pos_of(&a), Vec2::new(50.0, 10.0));
        assert_eq!(pos_of(&b), Vec2::new(70.0, 10.0));
    }

    #[test]
    fn test_resizable_child_absorbs_space() {
        let mut al = Aligner::new(Axis::Horizontal);
        al.node_mut().set_padding(Padding::ZERO);
        al.set_spacing(4.0);
        al.node_mut().set_request(Size::new(300.0, 40.0));
        let a = block(50.0, 10.0);
        let r = block(20.0, 10.0);
        let b = block(60.0, 10.0);
        al.add(&a);
        al.add(&r);
        al.add(&b);
        al.set_resizable(Some(r.id()));
        let al = Handle::new(al);
        al.node_ref().layout();

        assert_eq!(size_of(&r).width, 182.0);
        assert_eq!(pos_of(&b).x, 240.0);
        assert_eq!(size_of(&al).width, 300.0);

        // shrinking floors the resizable child at its minimum
        al.lock().node_mut().set_request(Size::new(100.0, 40.0));
        al.node_ref().layout();
        assert_eq!(size_of(&r).width, 20.0);
        assert_eq!(size_of(&al).width, 138.0);
    }

    #[test]
    fn test_label_group_aligns_actions() {
        let m = measure();
        let group = LabelGroup::new();
        let a1 = block(30.0, 10.0);
        let a2 = block(30.0, 10.0);
        let short = Handle::new(LabeledWidget::new("a", &a1, m.clone()));
        let long = Handle::new(LabeledWidget::new("longer", &a2, m.clone()));
        group.add(&short);
        group.add(&long);
        NodeRef::new(group).layout();

        // "longer" is 6 chars at 7px each, then the 6px default gap
        assert_eq!(pos_of(&a1).x, 48.0);
        assert_eq!(pos_of(&a2).x, 48.0);
        assert_eq!(short.lock().label_rect().w, long.lock().label_rect().w);
    }

    #[test]
    fn test_label_above_action() {
        let a = block(30.0, 10.0);
        let mut c = LabeledWidget::new("ab", &a, measure());
        c.set_label_pos(LabelPos::Top);
        assert_eq!(c.min_size(), Size::new(30.0, 17.5 + 6.0 + 10.0));
        assert!(c.labeled().is_some());
        let c = NodeRef::new(c);
        c.layout();
        assert_eq!(pos_of(&a), Vec2::new(0.0, 23.5));
    }

    fn splitter_300() -> (Handle<Splitter>, [Handle<Block>; 3]) {
        let mut s = Splitter::new(Axis::Horizontal);
        s.set_spacing(0.0);
        s.node_mut().set_request(Size::new(300.0, 40.0));
        let kids = [block(20.0, 20.0), block(20.0, 20.0), block(20.0, 20.0)];
        kids[0].lock().node_mut().set_request(Size::new(100.0, 20.0));
        kids[1].lock().node_mut().set_request(Size::new(100.0, 20.0));
        for k in &kids {
            s.add(k);
        }
        let s = Handle::new(s);
        s.node_ref().layout();
        (s, kids)
    }

    #[test]
    fn test_splitter_drag_clamps_to_neighbor_minimum() {
        let (s, kids) = splitter_300();
        assert_eq!(size_of(&kids[2]).width, 100.0);

        let shift = Modifiers::SHIFT;
        let mut w = s.lock();
        assert!(w.handle_event(&InputEvent::press(Vec2::new(100.0, 20.0))).is_used());
        assert_eq!(w.cursor(), CursorIcon::ResizeHorizontal);
        w.handle_event(&InputEvent::drag(Vec2::new(290.0, 20.0)).with_modifiers(shift));
        w.handle_event(&InputEvent::release(Vec2::new(290.0, 20.0)));
        drop(w);

        assert_eq!(size_of(&kids[0]).width, 180.0);
        assert_eq!(size_of(&kids[1]).width, 20.0);
        assert_eq!(pos_of(&kids[2]).x, 200.0);
        assert_eq!(size_of(&kids[2]).width, 100.0);
    }

    #[test]
    fn test_splitter_snaps_unless_shift() {
        let (s, kids) = splitter_300();
        let mut w = s.lock();
        w.handle_event(&InputEvent::press(Vec2::new(100.0, 20.0)));
        w.handle_event(&InputEvent::drag(Vec2::new(105.0, 20.0)));
        assert_eq!(kids[0].lock().node().size().width, 100.0);
        w.handle_event(&InputEvent::drag(Vec2::new(105.0, 20.0)).with_modifiers(Modifiers::SHIFT));
        assert_eq!(kids[0].lock().node().size().width, 105.0);
    }

    #[test]
    fn test_splitter_drag_shrinks_container_pane() {
        let mut s = Splitter::new(Axis::Horizontal);
        s.set_spacing(0.0);
        s.node_mut().set_request(Size::new(300.0, 40.0));
        let mut pane = Aligner::new(Axis::Vertical);
        pane.node_mut().set_request(Size::new(150.0, 40.0));
        let inner = block(20.0, 10.0);
        pane.add(&inner);
        let pane = Handle::new(pane);
        let rest = block(10.0, 10.0);
        s.add(&pane);
        s.add(&rest);
        let s = Handle::new(s);
        s.node_ref().layout();
        assert_eq!(size_of(&pane).width, 150.0);
        assert_eq!(pos_of(&rest).x, 150.0);

        let mut w = s.lock();
        assert!(w.handle_event(&InputEvent::press(Vec2::new(150.0, 20.0))).is_used());
        w.handle_event(&InputEvent::drag(Vec2::new(60.0, 20.0)).with_modifiers(Modifiers::SHIFT));
        w.handle_event(&InputEvent::release(Vec2::new(60.0, 20.0)));
        drop(w);

        assert_eq!(size_of(&pane), Size::new(60.0, 40.0));
        assert_eq!(size_of(&inner).width, 52.0);
        assert_eq!(pos_of(&rest).x, 60.0);
        assert_eq!(size_of(&rest).width, 240.0);
    }

    #[test]
    fn test_splitter_ignores_presses_off_the_seam() {
        let (s, _) = splitter_300();
        let mut w = s.lock();
        assert_eq!(w.handle_event(&InputEvent::press(Vec2::new(50.0, 20.0))), Response::Ignored);
        assert!(!w.is_dragging());
    }

    #[test]
    fn test_grid_3x3_tracks() {
        let mut g = Grid::new();
        g.node_mut().set_padding(Padding::ZERO);
        g.set_spacing(2.0);
        let kids: Vec<_> = (0..9)
            .map(|i| if i == 4 { block(30.0, 15.0) } else { block(20.0, 10.0) })
            .collect();
        for k in &kids {
            g.add(k);
        }
        let g = Handle::new(g);
        g.node_ref().layout();

        assert_eq!(g.lock().columns(), 3);
        assert_eq!(g.lock().column_widths(), &[20.0, 30.0, 20.0]);
        assert_eq!(g.lock().row_heights(), &[10.0, 15.0, 10.0]);
        assert_eq!(pos_of(&kids[4]), Vec2::new(22.0, 12.0));
        assert_eq!(pos_of(&kids[8]), Vec2::new(54.0, 29.0));
        assert_eq!(size_of(&kids[3]), Size::new(20.0, 15.0));
        assert_eq!(size_of(&g), Size::new(74.0, 39.0));

        kids[0].lock().node_mut().set_visible(false);
        g.node_ref().layout();
        assert_eq!(pos_of(&kids[1]), Vec2::ZERO);
    }

    #[test]
    fn test_scroll_clamp_and_alignment_offset() {
        let mut s = ScrollState::new();
        s.set_align(Align::empty());
        s.set_extent(Rect::new(0.0, 0.0, 100.0, 100.0), Size::new(100.0, 50.0));
        assert_eq!(s.offset(), Vec2::new(0.0, -25.0));

        s.set_align(Align::LEFT | Align::TOP);
        s.set_extent(Rect::new(0.0, 0.0, 100.0, 100.0), Size::new(100.0, 300.0));
        s.set_offset(Vec2::new(0.0, 150.0));
        assert_eq!(s.scroll_immediate(Axis::Vertical, 100.0), 50.0);
        assert_eq!(s.offset().y, 200.0);
        s.set_offset(Vec2::new(0.0, -40.0));
        assert_eq!(s.offset().y, 0.0);

        assert!(s.wheel(Vec2::new(0.0, -1.0)));
        assert_eq!(s.offset().y, Metrics::default().wheel_step);
    }

    #[test]
    fn test_scroll_thumb_drag_maps_by_ratio() {
        let mut s = ScrollState::new();
        s.set_extent(Rect::new(0.0, 0.0, 100.0, 100.0), Size::new(100.0, 400.0));
        let thumb = s.thumb_rect(Axis::Vertical).expect("scrollable");
        assert_eq!(thumb.h, 25.0);
        assert!(s.begin_drag(Vec2::new(thumb.x + 1.0, 10.0)));
        s.drag_to(Vec2::new(thumb.x + 1.0, 20.0));
        assert_eq!(s.offset().y, 40.0);
        s.end_drag();
        assert!(!s.is_dragging());
    }

    #[test]
    fn test_scrollbar_fades_while_idle() {
        let mut s = ScrollState::new();
        s.touch();
        assert_eq!(s.visibility(), 1.0);
        let mut frames = 0;
        while s.tick_frame() {
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(s.visibility(), 0.0);
        assert!(frames > 0);
    }

    #[test]
    fn test_scroll_view_wheel_and_hit_test() {
        let mut col = Linear::column();
        col.node_mut().set_padding(Padding::ZERO);
        col.set_spacing(0.0);
        let rows: Vec<_> = (0..10).map(|_| block(20.0, 20.0)).collect();
        for r in &rows {
            col.add(r);
        }
        let mut view = ScrollView::new(NodeRef::new(col));
        view.node_mut().set_padding(Padding::ZERO);
        view.node_mut().set_request(Size::new(100.0, 50.0));
        let view = Handle::new(view);
        view.node_ref().layout();

        let mut w = view.lock();
        let ev = InputEvent::new(EventKind::Scroll(Vec2::new(0.0, -1.0)), Vec2::new(10.0, 10.0));
        assert!(w.handle_event(&ev).is_used());
        assert_eq!(w.state().offset().y, 20.0);
        assert_eq!(w.hit_test(Vec2::new(5.0, 5.0)), Some(rows[1].id()));
    }

    fn menu_items() -> Vec<MenuItem> {
        vec![
            MenuItem::submenu("More", vec![MenuItem::new("a", 1), MenuItem::new("b", 2)]),
            MenuItem::new("Off", 3).disabled(),
            MenuItem::separator(),
            MenuItem::new("Quit", 9),
        ]
    }

    #[test]
    fn test_menu_teardown_happens_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let mut menu = PopupMenu::new(menu_items(), measure()).on_level(move |e| sink.lock().push(e));

        // item height: 17.5px line + 2 * 4px padding
        menu.handle_event(&InputEvent::moved(Vec2::new(10.0, 12.0)));
        assert_eq!(menu.stack().depth(), 2);
        menu.handle_event(&InputEvent::moved(Vec2::new(12.0, 12.0)));
        menu.handle_event(&InputEvent::moved(Vec2::new(10.0, 38.0)));
        assert_eq!(menu.stack().depth(), 1);
        assert_eq!(
            *log.lock(),
            vec![MenuEvent::Opened { depth: 1 }, MenuEvent::Closed { depth: 1 }]
        );
    }

    #[test]
    fn test_menu_inert_rows_and_selection() {
        let picked = Arc::new(Mutex::new(None));
        let sink = picked.clone();
        let mut menu = PopupMenu::new(menu_items(), measure()).on_select(move |p| *sink.lock() = Some(p));

        // disabled row and separator do nothing
        menu.handle_event(&InputEvent::release(Vec2::new(10.0, 38.0)));
        menu.handle_event(&InputEvent::release(Vec2::new(10.0, 64.0)));
        assert!(!menu.close_requested());

        // open the cascade and pick its second entry
        menu.handle_event(&InputEvent::moved(Vec2::new(10.0, 12.0)));
        let sub = menu.stack().level_rect(1).expect("submenu");
        let at = Vec2::new(sub.x + 5.0, sub.y + 38.0);
        menu.handle_event(&InputEvent::moved(at));
        menu.handle_event(&InputEvent::release(at));
        assert_eq!(*picked.lock(), Some(2));
        assert!(menu.close_requested());
        assert_eq!(menu.stack().depth(), 1);
    }

    #[test]
    fn test_menu_release_outside_dismisses() {
        let mut stack = MenuStack::new(menu_items(), measure());
        assert_eq!(stack.release(Vec2::new(500.0, 500.0)), Some(MenuEvent::Dismissed));
        assert_eq!(stack.release(Vec2::new(10.0, 90.0)), Some(MenuEvent::Selected(9)));
    }

    fn dismiss_log() -> (Arc<Mutex<Vec<DismissReason>>>, screen::DismissFn) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        (log, Box::new(move |r| sink.lock().push(r)))
    }

    #[test]
    fn test_popup_click_outside_dismisses_and_falls_through() {
        let root = Linear::column();
        let clicks = Arc::new(Mutex::new(0));
        let sink = clicks.clone();
        let button = Handle::new(Button::new("go", measure()).on_click(move || *sink.lock() += 1));
        root.add(&button);
        let mut screen = Screen::new(NodeRef::new(root), Size::new(400.0, 300.0));
        screen.layout();

        let (log, on_dismiss) = dismiss_log();
        let menu = PopupMenu::new(menu_items(), measure());
        screen.popups_mut().show_with(NodeRef::new(menu), Vec2::new(200.0, 200.0), Some(on_dismiss));
        screen.layout();

        let at = pos_of(&button) + Vec2::new(2.0, 2.0);
        screen.handle(&InputEvent::press(at));
        assert!(screen.popups().is_empty());
        assert_eq!(*log.lock(), vec![DismissReason::ClickOutside]);
        screen.handle(&InputEvent::release(at));
        assert_eq!(*clicks.lock(), 1);
    }

    #[test]
    fn test_popup_selection_closes_with_action() {
        let mut screen = Screen::new(NodeRef::new(Linear::column()), Size::new(400.0, 300.0));
        let (log, on_dismiss) = dismiss_log();
        let menu = PopupMenu::new(menu_items(), measure());
        let id = screen
            .popups_mut()
            .show_with(NodeRef::new(menu), Vec2::new(100.0, 100.0), Some(on_dismiss));
        screen.layout();
        assert!(screen.popups().is_open(id));

        let quit = Vec2::new(110.0, 190.0);
        screen.handle(&InputEvent::moved(quit));
        screen.handle(&InputEvent::release(quit));
        assert!(!screen.popups().is_open(id));
        assert_eq!(*log.lock(), vec![DismissReason::Action]);
    }

    #[test]
    fn test_popup_escape_cancels() {
        let mut screen = Screen::new(NodeRef::new(Linear::column()), Size::new(400.0, 300.0));
        let (log, on_dismiss) = dismiss_log();
        let menu = PopupMenu::new(menu_items(), measure());
        screen.popups_mut().show_with(NodeRef::new(menu), Vec2::ZERO, Some(on_dismiss));
        let esc = InputEvent::new(EventKind::KeyDown(Key::Escape), Vec2::ZERO);
        assert!(screen.handle(&esc).is_used());
        assert_eq!(*log.lock(), vec![DismissReason::Cancel]);
    }

    struct SharedDepth(Arc<Mutex<f32>>);

    impl DepthSampler for SharedDepth {
        fn depth_at(&self, _pixel: Vec2) -> f32 {
            *self.0.lock()
        }
    }

    #[test]
    fn test_picker_locks_depth_while_dragging() {
        let depth = Arc::new(Mutex::new(0.3));
        let mut picker = Picker3d::new(SharedDepth(depth.clone()));
        picker.set_viewport(Size::new(100.0, 100.0));
        picker.on_push(|_, _| true);
        let dragged = Arc::new(Mutex::new(Vec::new()));
        let sink = dragged.clone();
        picker.on_drag(move |p| sink.lock().push(p));

        assert!(picker.press(PointerButton::Primary, Vec2::new(50.0, 50.0)));
        assert_eq!(picker.state(), PickState::Locked { depth: 0.3 });

        *depth.lock() = 0.9;
        picker.drag(Vec2::new(75.0, 50.0));
        let expected = picker.unproject(Vec2::new(75.0, 50.0), 0.3).expect("invertible");
        assert_eq!(dragged.lock().last().copied(), Some(expected));
        assert!((expected.z - (-0.4)).abs() < 1e-6);
        assert_eq!(picker.last().map(|(_, d)| d), Some(0.3));

        picker.release(PointerButton::Primary, Vec2::new(75.0, 50.0));
        assert_eq!(picker.state(), PickState::Idle);
        picker.pointer_move(Vec2::new(75.0, 50.0));
        assert_eq!(picker.last().map(|(_, d)| d), Some(0.9));
    }

    #[test]
    fn test_picker_unclaimed_press_stays_idle() {
        let mut picker = Picker3d::new(|_: Vec2| 0.5);
        picker.set_viewport(Size::new(10.0, 10.0));
        assert!(!picker.press(PointerButton::Primary, Vec2::new(5.0, 5.0)));
        assert_eq!(picker.state(), PickState::Idle);
    }

    #[test]
    fn test_picker_singular_matrix_disables_unproject() {
        let mut picker = Picker3d::new(|_: Vec2| 0.5);
        picker.set_viewport(Size::new(10.0, 10.0));
        assert_eq!(
            picker.unproject(Vec2::new(5.0, 5.0), 0.5),
            Some(Vec3::new(0.0, 0.0, 0.0))
        );
        picker.set_view_proj(Mat4::zero());
        assert_eq!(picker.unproject(Vec2::new(5.0, 5.0), 0.5), None);
    }

    #[test]
    fn test_number_box_validation() {
        let mut nb = NumberBox::new(1.0, 0.0, 100.0, measure());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let cell = Arc::new(Mutex::new(0.0));
        let sink = seen.clone();
        nb.slot().set_on_change(move |v| sink.lock().push(*v));
        nb.slot().bind(cell.clone());

        assert_eq!(nb.text(), "1.00");
        assert!(matches!(nb.set_text("abc"), Err(UiError::InvalidNumber(_))));
        assert!(!nb.is_valid());
        assert_eq!(nb.value(), 1.0);

        assert!(matches!(nb.set_text("500"), Err(UiError::OutOfRange { .. })));
        assert_eq!(nb.value(), 1.0);

        assert!(nb.set_text("42.5").is_ok());
        assert!(nb.is_valid());
        assert_eq!(nb.value(), 42.5);
        assert_eq!(*cell.lock(), 42.5);

        nb.set_value(7.0).expect("in range");
        assert_eq!(nb.text(), "7.00");
        assert_eq!(*seen.lock(), vec![42.5, 7.0]);
    }

    #[test]
    fn test_number_box_typing_commits() {
        let mut nb = NumberBox::new(0.0, 0.0, 100.0, measure()).with_precision(0);
        assert_eq!(nb.text(), "0");
        nb.handle_event(&InputEvent::new(EventKind::KeyDown(Key::Character('5')), Vec2::ZERO));
        assert_eq!(nb.text(), "05");
        assert_eq!(nb.value(), 5.0);
        nb.handle_event(&InputEvent::new(EventKind::KeyDown(Key::Character('5')), Vec2::ZERO));
        nb.handle_event(&InputEvent::new(EventKind::KeyDown(Key::Character('5')), Vec2::ZERO));
        assert!(!nb.is_valid());
        assert_eq!(nb.value(), 55.0);
        nb.handle_event(&InputEvent::new(EventKind::KeyDown(Key::Escape), Vec2::ZERO));
        assert!(nb.is_valid());
        assert_eq!(nb.text(), "55");
    }

    #[test]
    fn test_checkbox_toggles_on_release_inside() {
        let cell = Arc::new(Mutex::new(false));
        let mut cb = Checkbox::new(false);
        cb.slot().bind(cell.clone());
        let cb = NodeRef::new(cb);
        cb.layout();
        let mut w = cb.lock();
        w.handle_event(&InputEvent::press(Vec2::new(2.0, 2.0)));
        w.handle_event(&InputEvent::release(Vec2::new(2.0, 2.0)));
        assert!(*cell.lock());
        w.handle_event(&InputEvent::press(Vec2::new(2.0, 2.0)));
        w.handle_event(&InputEvent::release(Vec2::new(500.0, 2.0)));
        assert!(*cell.lock());
    }

    #[test]
    fn test_slider_grab_follows_pointer_outside() {
        let mut root = Linear::column();
        root.node_mut().set_padding(Padding::ZERO);
        let cell = Arc::new(Mutex::new(0.0f32));
        let mut slider = Slider::new(0.0, 0.0, 10.0);
        slider.slot().bind(cell.clone());
        let slider = Handle::new(slider);
        root.add(&slider);
        let mut screen = Screen::new(NodeRef::new(root), Size::new(400.0, 300.0));
        screen.layout();
        assert_eq!(size_of(&slider), Size::new(96.0, 24.0));

        screen.handle(&InputEvent::press(Vec2::new(48.0, 12.0)));
        assert_eq!(*cell.lock(), 5.0);
        screen.handle(&InputEvent::drag(Vec2::new(300.0, 200.0)));
        assert_eq!(*cell.lock(), 10.0);
        screen.handle(&InputEvent::release(Vec2::new(300.0, 200.0)));
        screen.handle(&InputEvent::drag(Vec2::new(0.0, 12.0)));
        assert_eq!(slider.lock().value(), 10.0);
    }

    #[test]
    fn test_click_handler_can_grow_its_own_parent() {
        let mut col = Linear::column();
        col.node_mut().set_padding(Padding::ZERO);
        let list = col.list().clone();
        let button = Button::new("ok", measure()).on_click(move || {
            list.add(NodeRef::new(Block::new(Size::new(10.0, 10.0))));
        });
        col.add(NodeRef::new(button));
        let col = Handle::new(col);
        let mut screen = Screen::new(&col, Size::new(200.0, 100.0));
        screen.layout();

        // the release reaches the button through the pointer grab
        screen.handle(&InputEvent::press(Vec2::new(5.0, 5.0)));
        screen.handle(&InputEvent::release(Vec2::new(5.0, 5.0)));
        assert_eq!(col.lock().list().len(), 2);
        assert!(screen.layout());

        // and here through the column's own dispatch over the same list
        col.lock().handle_event(&InputEvent::press(Vec2::new(5.0, 5.0)));
        col.lock().handle_event(&InputEvent::release(Vec2::new(5.0, 5.0)));
        assert_eq!(col.lock().list().len(), 3);
        assert!(col.lock().changed());
    }

    #[test]
    fn test_slider_step_snaps() {
        let mut s = Slider::new(0.0, 0.0, 1.0).with_step(0.25);
        s.set_value(0.6);
        assert_eq!(s.value(), 0.5);
        s.set_value(7.0);
        assert_eq!(s.value(), 1.0);
    }

    #[test]
    fn test_screen_hover_and_redraw() {
        let m = measure();
        let mut b = Builder::new(m);
        let mut ok = None;
        let root = b.column(|b| {
            b.label("title");
            ok = Some(b.button("ok", || {}));
        });
        let ok = ok.expect("built");
        let mut screen = Screen::new(root, Size::new(200.0, 100.0));
        screen.layout();

        let at = pos_of(&ok) + Vec2::new(3.0, 3.0);
        screen.handle(&InputEvent::moved(at));
        assert_eq!(screen.hovered(), Some(ok.id()));
        let scene = screen.draw();
        assert!(!scene.nodes.is_empty());
        assert!(!screen.needs_redraw());
    }

    #[test]
    fn test_builder_nests_and_labels() {
        let mut b = Builder::new(measure());
        let mut inner = None;
        let root = b.group(|b| {
            b.labeled("speed", Slider::new(1.0, 0.0, 2.0));
            inner = Some(b.labeled("size", NumberBox::new(3.0, 0.0, 9.0, b.measure())));
        });
        let (composite, action) = inner.expect("built");
        assert_eq!(root.lock().list().len(), 2);
        assert_eq!(composite.lock().action_id(), action.id());
        assert_eq!(b.depth(), 0);
    }
}
