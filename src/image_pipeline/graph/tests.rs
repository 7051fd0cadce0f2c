#[cfg(test)]
mod tests {
    use crate::image_pipeline::camera_model::fixtures::{trivial_model, warped_model};
    use crate::image_pipeline::camera_model::{CameraModel, GamutDirection};
    use crate::image_pipeline::common::error::PipelineError;
    use crate::image_pipeline::graph::{
        GraphBuilder, GraphState, PixelGraph, Realized, Schedule, Stage, StageId,
    };
    use crate::image_pipeline::stages::{Domain, PixelBuffer};

    fn gradient(width: usize, height: usize) -> PixelBuffer<u8> {
        PixelBuffer::from_fn(Domain::rgb(width, height), |x, y, c| {
            ((x * 37 + y * 61 + c * 89) % 256) as u8
        })
    }

    struct Ids {
        tone: StageId,
        response: StageId,
        bias: StageId,
        transform: StageId,
    }

    fn reverse_graph(model: &CameraModel, input: PixelBuffer<u8>) -> (PixelGraph<'_>, Ids) {
        let gamut = model.gamut(GamutDirection::Reverse);
        let mut b = GraphBuilder::new(input.width(), input.height());
        let src = b.add_stage("input", Stage::Source(input.into()));
        let scale = b.add("scale", Stage::Scale, &[src]).unwrap();
        let tone = b
            .add("rev_tone_map", Stage::ReverseToneMap(model.reverse_tone()), &[scale])
            .unwrap();
        let response = b.add("rbf_ctrl", Stage::RbfResponse(gamut), &[tone]).unwrap();
        let bias = b
            .add("rbf_bias", Stage::RbfBiasSum(gamut), &[tone, response])
            .unwrap();
        let transform = b
            .add(
                "rev_transform",
                Stage::ColorTransform(model.reverse_transform()),
                &[bias],
            )
            .unwrap();
        (
            b.build().unwrap(),
            Ids {
                tone,
                response,
                bias,
                transform,
            },
        )
    }

    #[test]
    fn test_cycle_rejected() {
        let mut b = GraphBuilder::new(2, 2);
        let a = b.add_stage("a", Stage::Scale);
        let c = b.add_stage("c", Stage::Scale);
        b.bind(a, &[c]).unwrap();
        b.bind(c, &[a]).unwrap();
        assert!(matches!(b.build().unwrap_err(), PipelineError::GraphCycleError(_)));
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut b = GraphBuilder::new(2, 2);
        let a = b.add_stage("a", Stage::Descale);
        b.bind(a, &[a]).unwrap();
        assert!(matches!(b.build().unwrap_err(), PipelineError::GraphCycleError(name) if name == "a"));
    }

    #[test]
    fn test_unknown_stage_id() {
        let mut other = GraphBuilder::new(2, 2);
        other.add_stage("x", Stage::Scale);
        let foreign = other.add_stage("y", Stage::Scale);

        let mut b = GraphBuilder::new(2, 2);
        let a = b.add_stage("a", Stage::Scale);
        assert!(matches!(
            b.bind(a, &[foreign]).unwrap_err(),
            PipelineError::InvalidStateError(_)
        ));
    }

    #[test]
    fn test_missing_input_rejected() {
        let mut b = GraphBuilder::new(2, 2);
        b.add_stage("scale", Stage::Scale);
        assert!(matches!(
            b.build().unwrap_err(),
            PipelineError::DimensionMismatchError { .. }
        ));
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let model = trivial_model();
        let gamut = model.gamut(GamutDirection::Reverse);
        let mut b = GraphBuilder::new(2, 2);
        let src = b.add_stage("input", Stage::Source(gradient(2, 2).into()));
        // one control point, but the response input has 3 channels
        b.add("bias", Stage::RbfBiasSum(gamut), &[src, src]).unwrap();
        let err = b.build().unwrap_err();
        assert!(matches!(err, PipelineError::DimensionMismatchError { .. }), "{err}");
    }

    #[test]
    fn test_source_domain_mismatch() {
        let mut b = GraphBuilder::new(3, 3);
        b.add_stage("input", Stage::Source(gradient(2, 2).into()));
        assert!(b.build().is_err());
    }

    #[test]
    fn test_empty_domain_rejected() {
        let b = GraphBuilder::new(0, 4);
        assert!(matches!(
            b.build().unwrap_err(),
            PipelineError::InvalidDimensions(0, 4)
        ));
    }

    #[test]
    fn test_state_machine() {
        let model = warped_model();
        let (mut graph, ids) = reverse_graph(&model, gradient(3, 2));
        assert_eq!(graph.state(), GraphState::Built);

        graph.mark_root(ids.tone).unwrap();
        assert_eq!(graph.state(), GraphState::Scheduled);
        assert_eq!(graph.schedule(ids.tone), Schedule::Root);
        assert_eq!(graph.schedule(ids.bias), Schedule::Lazy);

        graph.realize(ids.transform).unwrap();
        assert_eq!(graph.state(), GraphState::Realized);

        assert!(matches!(
            graph.realize(ids.transform).unwrap_err(),
            PipelineError::InvalidStateError(_)
        ));
        assert!(matches!(
            graph.mark_root(ids.response).unwrap_err(),
            PipelineError::InvalidStateError(_)
        ));
    }

    #[test]
    fn test_realize_without_schedule() {
        let model = warped_model();
        let (mut graph, ids) = reverse_graph(&model, gradient(2, 2));
        let out = graph.realize(ids.bias).unwrap().into_f32().unwrap();
        assert_eq!(out.domain(), Domain::rgb(2, 2));
    }

    #[test]
    fn test_root_and_lazy_are_bit_identical() {
        let model = warped_model();
        let input = gradient(7, 5);

        let (mut lazy, ids) = reverse_graph(&model, input.clone());
        let lazy_out = lazy.realize(ids.transform).unwrap();

        let (mut rooted, ids) = reverse_graph(&model, input.clone());
        rooted.mark_root(ids.tone).unwrap();
        rooted.mark_root(ids.response).unwrap();
        let rooted_out = rooted.realize(ids.transform).unwrap();

        let (mut eager, ids) = reverse_graph(&model, input);
        for name in ["scale", "rev_tone_map", "rbf_ctrl", "rbf_bias"] {
            let id = eager.find(name).unwrap();
            eager.mark_root(id).unwrap();
        }
        let eager_out = eager.realize(ids.transform).unwrap();

        assert_eq!(lazy_out, rooted_out);
        assert_eq!(lazy_out, eager_out);
    }

    #[test]
    fn test_response_stage_has_one_channel_per_control_point() {
        let model = warped_model();
        let (mut graph, ids) = reverse_graph(&model, gradient(4, 3));
        graph.mark_root(ids.response).unwrap();
        assert_eq!(graph.stage_domain(ids.response).channels, 3);
        assert_eq!(graph.consumers(ids.tone), 2);
        assert_eq!(graph.consumers(ids.response), 1);

        let out = graph.realize(ids.response).unwrap().into_f32().unwrap();
        let gamut = model.gamut(GamutDirection::Reverse);
        let tone = model.reverse_tone();
        let v = [
            tone.lookup(out_input(1, 2, 0), 0),
            tone.lookup(out_input(1, 2, 1), 1),
            tone.lookup(out_input(1, 2, 2), 2),
        ];
        for k in 0..gamut.len() {
            assert_eq!(out.get(1, 2, k), gamut.response(v, k));
        }
    }

    fn out_input(x: usize, y: usize, c: usize) -> f32 {
        gradient(4, 3).get(x, y, c) as f32 / 255.0
    }

    #[test]
    fn test_descale_terminal_yields_u8() {
        let mut b = GraphBuilder::new(2, 1);
        let src = b.add_stage(
            "input",
            Stage::Source(
                PixelBuffer::from_vec(Domain::rgb(2, 1), vec![0.0, 0.5, 1.0, -1.0, 2.0, 0.2])
                    .unwrap()
                    .into(),
            ),
        );
        let descale = b.add("descale", Stage::Descale, &[src]).unwrap();
        let mut graph = b.build().unwrap();
        let out = graph.realize(descale).unwrap();
        assert!(matches!(out, Realized::U8(_)));
        assert_eq!(out.into_u8().unwrap().as_slice(), &[0, 128, 255, 0, 255, 51]);
    }

    #[test]
    fn test_realized_type_mismatch() {
        let mut b = GraphBuilder::new(1, 1);
        let src = b.add_stage("input", Stage::Source(gradient(1, 1).into()));
        let scale = b.add("scale", Stage::Scale, &[src]).unwrap();
        let mut graph = b.build().unwrap();
        assert!(graph.realize(scale).unwrap().into_u8().is_err());
    }
}
